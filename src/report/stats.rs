//! Summary statistics for build snapshots.
//!
//! Counts are used by the console table, the Markdown report and the
//! one-line webhook headline.

use crate::types::BuildInformation;

/// Diagnostic counts for one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformStats {
    pub platform: String,
    pub errors: usize,
    pub warnings: usize,
    pub unit_tests: usize,
}

impl PlatformStats {
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.unit_tests
    }

    /// Errors or failed tests make a platform red
    pub fn has_failures(&self) -> bool {
        self.errors > 0 || self.unit_tests > 0
    }
}

/// Count diagnostics per category for a snapshot
pub fn platform_stats(info: &BuildInformation) -> PlatformStats {
    PlatformStats {
        platform: info.platform().to_string(),
        errors: info.errors().len(),
        warnings: info.warnings().len(),
        unit_tests: info.unit_tests().len(),
    }
}

/// Counts for every snapshot, in input order
pub fn summarize_infos<'a, I>(infos: I) -> Vec<PlatformStats>
where
    I: IntoIterator<Item = &'a BuildInformation>,
{
    infos.into_iter().map(platform_stats).collect()
}

/// One-line summary, e.g. `ios: 2 errors, 1 warning, 0 failed tests`
pub fn headline(stats: &PlatformStats) -> String {
    fn plural(n: usize, singular: &str, plural: &str) -> String {
        format!("{} {}", n, if n == 1 { singular } else { plural })
    }

    format!(
        "{}: {}, {}, {}",
        stats.platform,
        plural(stats.errors, "error", "errors"),
        plural(stats.warnings, "warning", "warnings"),
        plural(stats.unit_tests, "failed test", "failed tests")
    )
}
