/// Core data structures for parsed build logs
///
/// This module defines the diagnostic records extracted from a build log and
/// the per-platform snapshot that groups them. Every category is stored in an
/// ordered set: structurally equal records collapse into one, and iteration
/// order is the same on every run.
use std::collections::BTreeSet;
use std::fmt;

/// Platform label given to the snapshot of diagnostics shared by every compared platform
pub const CORE_PLATFORM: &str = "Core";

/// Exit code reported for a log without an exit-status marker
pub const UNKNOWN_EXIT_CODE: i64 = -1;

/// Severity of a compiler diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Error,
    Warning,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Error => "error",
            MessageKind::Warning => "warning",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiler error or warning anchored to a source location
///
/// Field order matters: the derived `Ord` sorts by file, then line, then
/// message, then kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct CompilerMessage {
    pub file: String,
    pub line: u32,
    pub message: String,
    pub kind: MessageKind,
}

impl CompilerMessage {
    pub fn new(file: impl Into<String>, line: u32, message: impl Into<String>, kind: MessageKind) -> Self {
        Self { file: file.into(), line, message: message.into(), kind }
    }

    /// `file:line`, as shown in reports
    pub fn location(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

/// A failing unit test
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct UnitTestMessage {
    pub method: String,
    pub explanation: String,
}

impl UnitTestMessage {
    pub fn new(method: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self { method: method.into(), explanation: explanation.into() }
    }
}

/// Immutable snapshot of the diagnostics found in one platform's build log
///
/// Instances are produced by [`BuildInformationBuilder`] or read back from a
/// report file. Transformations (see `diff`) return new snapshots.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "SnapshotRecord")]
pub struct BuildInformation {
    platform: String,
    errors: BTreeSet<CompilerMessage>,
    warnings: BTreeSet<CompilerMessage>,
    unit_tests: BTreeSet<UnitTestMessage>,
}

/// Snapshot as stored on disk, before category kinds are checked
#[derive(serde::Deserialize)]
struct SnapshotRecord {
    platform: String,
    #[serde(default)]
    errors: BTreeSet<CompilerMessage>,
    #[serde(default)]
    warnings: BTreeSet<CompilerMessage>,
    #[serde(default)]
    unit_tests: BTreeSet<UnitTestMessage>,
}

fn check_kind(category: &str, messages: &BTreeSet<CompilerMessage>, kind: MessageKind) -> Result<(), String> {
    match messages.iter().find(|m| m.kind != kind) {
        Some(m) => Err(format!("{} holds a {} at {}", category, m.kind, m.location())),
        None => Ok(()),
    }
}

impl TryFrom<SnapshotRecord> for BuildInformation {
    type Error = String;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        check_kind("errors", &record.errors, MessageKind::Error)?;
        check_kind("warnings", &record.warnings, MessageKind::Warning)?;
        Ok(Self::from_parts(record.platform, record.errors, record.warnings, record.unit_tests))
    }
}

impl BuildInformation {
    pub(crate) fn from_parts(
        platform: String,
        errors: BTreeSet<CompilerMessage>,
        warnings: BTreeSet<CompilerMessage>,
        unit_tests: BTreeSet<UnitTestMessage>,
    ) -> Self {
        Self { platform, errors, warnings, unit_tests }
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn errors(&self) -> &BTreeSet<CompilerMessage> {
        &self.errors
    }

    pub fn warnings(&self) -> &BTreeSet<CompilerMessage> {
        &self.warnings
    }

    pub fn unit_tests(&self) -> &BTreeSet<UnitTestMessage> {
        &self.unit_tests
    }

    /// True when no category holds a diagnostic
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.unit_tests.is_empty()
    }

    /// Total number of diagnostics across all categories
    pub fn len(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.unit_tests.len()
    }
}

/// Accumulates extractor output into a [`BuildInformation`]
#[derive(Debug, Default)]
pub struct BuildInformationBuilder {
    platform: String,
    errors: BTreeSet<CompilerMessage>,
    warnings: BTreeSet<CompilerMessage>,
    unit_tests: BTreeSet<UnitTestMessage>,
}

impl BuildInformationBuilder {
    pub fn new(platform: impl Into<String>) -> Self {
        Self { platform: platform.into(), ..Default::default() }
    }

    pub fn errors(mut self, errors: impl IntoIterator<Item = CompilerMessage>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn warnings(mut self, warnings: impl IntoIterator<Item = CompilerMessage>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn unit_tests(mut self, unit_tests: impl IntoIterator<Item = UnitTestMessage>) -> Self {
        self.unit_tests.extend(unit_tests);
        self
    }

    pub fn build(self) -> BuildInformation {
        BuildInformation::from_parts(self.platform, self.errors, self.warnings, self.unit_tests)
    }
}

/// Outcome of the build as reported by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", content = "code", rename_all = "snake_case")]
pub enum ExitOutcome {
    /// `Exit status: <code>` was found and no failure phrase overrides it
    Known(i64),
    /// No exit-status marker in the log
    Unknown,
    /// The pipeline printed its "finished with errors" phrase
    FailedWithErrors,
}

impl ExitOutcome {
    /// Numeric code, with [`UNKNOWN_EXIT_CODE`] for `Unknown` and 1 for `FailedWithErrors`
    pub fn code(&self) -> i64 {
        match self {
            ExitOutcome::Known(code) => *code,
            ExitOutcome::Unknown => UNKNOWN_EXIT_CODE,
            ExitOutcome::FailedWithErrors => 1,
        }
    }

    /// Whether the build should be treated as failed. `Unknown` is not a failure signal.
    pub fn is_failure(&self) -> bool {
        match self {
            ExitOutcome::Known(code) => *code != 0,
            ExitOutcome::Unknown => false,
            ExitOutcome::FailedWithErrors => true,
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Known(code) => write!(f, "exit {}", code),
            ExitOutcome::Unknown => f.write_str("unknown"),
            ExitOutcome::FailedWithErrors => f.write_str("finished with errors"),
        }
    }
}

/// Result of parsing one platform's log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLog {
    pub info: BuildInformation,
    pub exit: ExitOutcome,
}

#[cfg(test)]
#[path = "data_structures_test.rs"]
mod data_structures_test;
