/// Cross-platform diffing of build snapshots
///
/// A diagnostic that reproduces identically on both platforms is reported once,
/// under the `Core` label, and removed from each platform's own section.
use crate::types::{BuildInformation, CORE_PLATFORM};
use log::debug;
use std::collections::BTreeSet;

/// Common snapshot plus per-platform residuals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOutcome {
    pub common: Option<BuildInformation>,
    pub residual: Vec<BuildInformation>,
}

fn intersect<T: Ord + Clone>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    a.intersection(b).cloned().collect()
}

fn subtract<T: Ord + Clone>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    a.difference(b).cloned().collect()
}

/// Diagnostics present in both snapshots, labeled `Core`.
///
/// Defined for exactly two snapshots; returns `None` for any other count.
/// Platform labels play no part in the comparison.
pub fn common_infos(infos: &[BuildInformation]) -> Option<BuildInformation> {
    let [a, b] = infos else {
        debug!("no common diagnostics computed for {} snapshot(s)", infos.len());
        return None;
    };

    let common = BuildInformation::from_parts(
        CORE_PLATFORM.to_string(),
        intersect(a.errors(), b.errors()),
        intersect(a.warnings(), b.warnings()),
        intersect(a.unit_tests(), b.unit_tests()),
    );
    debug!("{} and {} share {} diagnostics", a.platform(), b.platform(), common.len());
    Some(common)
}

/// Remove every diagnostic in `common` from each snapshot.
///
/// With fewer than two snapshots the input is returned unchanged.
pub fn strip_infos(common: &BuildInformation, infos: &[BuildInformation]) -> Vec<BuildInformation> {
    if infos.len() < 2 {
        return infos.to_vec();
    }

    infos
        .iter()
        .map(|info| {
            BuildInformation::from_parts(
                info.platform().to_string(),
                subtract(info.errors(), common.errors()),
                subtract(info.warnings(), common.warnings()),
                subtract(info.unit_tests(), common.unit_tests()),
            )
        })
        .collect()
}

/// Compute the common snapshot and strip it from every input
pub fn split_common(infos: &[BuildInformation]) -> DiffOutcome {
    match common_infos(infos) {
        Some(common) => {
            let residual = strip_infos(&common, infos);
            DiffOutcome { common: Some(common), residual }
        }
        None => DiffOutcome { common: None, residual: infos.to_vec() },
    }
}
