//! Report export functions for JSON and Markdown formats.
//!
//! `summarize` writes one JSON snapshot file per platform; `compare` reads two
//! of them back and writes the Markdown comparison report.

use super::render::render_infos;
use super::stats::{PlatformStats, summarize_infos};
use crate::diff::DiffOutcome;
use crate::error::{LaneError, Result};
use crate::types::{BuildInformation, ExitOutcome, ParsedLog};
use log::debug;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Contents of a per-platform snapshot file
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SummaryFile {
    pub tool_version: String,
    pub generated_at: String,
    pub exit_status: ExitOutcome,
    pub build: BuildInformation,
}

impl SummaryFile {
    pub fn new(parsed: &ParsedLog) -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            exit_status: parsed.exit,
            build: parsed.info.clone(),
        }
    }
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| LaneError::io(parent, e))?;
    }
    File::create(path).map_err(|e| LaneError::io(path, e))
}

/// Write a snapshot file as pretty-printed JSON.
pub fn write_summary(path: &Path, summary: &SummaryFile) -> Result<()> {
    debug!("writing {} snapshot to {:?}", summary.build.platform(), path);

    let mut writer = BufWriter::new(create_file(path)?);
    serde_json::to_writer_pretty(&mut writer, summary)
        .map_err(|e| LaneError::Report { path: path.to_path_buf(), source: e })?;
    writeln!(writer).map_err(|e| LaneError::io(path, e))?;
    writer.flush().map_err(|e| LaneError::io(path, e))
}

/// Read a snapshot file written by [`write_summary`].
pub fn read_summary(path: &Path) -> Result<SummaryFile> {
    debug!("reading snapshot from {:?}", path);

    let file = File::open(path).map_err(|e| LaneError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| LaneError::Report { path: path.to_path_buf(), source: e })
}

fn write_stats_table(out: &mut String, stats: &[PlatformStats]) {
    out.push_str("| Platform | Errors | Warnings | Failed tests |\n");
    out.push_str("|----------|-------:|---------:|-------------:|\n");
    for s in stats {
        let _ = writeln!(out, "| {} | {} | {} | {} |", s.platform, s.errors, s.warnings, s.unit_tests);
    }
}

/// Format the Markdown comparison report.
///
/// The summary table lists the full snapshots, the detail section lists the
/// shared diagnostics once under `Core` followed by each platform's residual.
pub fn format_markdown_report(summaries: &[SummaryFile], diff: &DiffOutcome) -> String {
    let mut out = String::new();

    out.push_str("# Build Diagnostics Report\n\n");
    let _ = writeln!(out, "**Generated**: {}\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

    out.push_str("## Summary\n\n");
    write_stats_table(&mut out, &summarize_infos(summaries.iter().map(|s| &s.build)));
    out.push('\n');
    for summary in summaries {
        let _ = writeln!(out, "- {}: {}", summary.build.platform(), summary.exit_status);
    }
    out.push('\n');

    out.push_str("# Details\n\n");
    out.push_str(&render_infos(diff.common.iter().chain(diff.residual.iter())));

    out
}

/// Write the Markdown comparison report to `output_path`.
pub fn export_markdown_report(output_path: &Path, summaries: &[SummaryFile], diff: &DiffOutcome) -> Result<()> {
    let mut file = create_file(output_path)?;
    file.write_all(format_markdown_report(summaries, diff).as_bytes()).map_err(|e| LaneError::io(output_path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::split_common;
    use crate::types::{BuildInformationBuilder, CompilerMessage, MessageKind, UnitTestMessage};
    use tempfile::TempDir;

    fn parsed(platform: &str, exit: ExitOutcome) -> ParsedLog {
        let info = BuildInformationBuilder::new(platform)
            .errors(vec![CompilerMessage::new("/src/App.swift", 10, "cannot find 'foo'", MessageKind::Error)])
            .warnings(vec![CompilerMessage::new(format!("/src/{}.swift", platform), 3, "unused", MessageKind::Warning)])
            .unit_tests(vec![UnitTestMessage::new("testLogin", "XCTAssertTrue failed: \"quoted\"")])
            .build();
        ParsedLog { info, exit }
    }

    #[test]
    fn test_summary_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/ios.json");
        let summary = SummaryFile::new(&parsed("ios", ExitOutcome::Known(65)));

        write_summary(&path, &summary).unwrap();
        let read_back = read_summary(&path).unwrap();

        assert_eq!(read_back, summary);
        assert_eq!(read_back.build.platform(), "ios");
        assert_eq!(read_back.exit_status, ExitOutcome::Known(65));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let result = read_summary(&temp.path().join("missing.json"));
        assert!(matches!(result, Err(LaneError::Io { .. })));
    }

    #[test]
    fn test_read_invalid_json_is_report_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_summary(&path), Err(LaneError::Report { .. })));
    }

    #[test]
    fn test_read_misfiled_kind_is_report_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ios.json");
        fs::write(
            &path,
            r#"{"tool_version":"0.1.0","generated_at":"2026-01-01 00:00:00","exit_status":{"status":"unknown"},
"build":{"platform":"ios","errors":[{"file":"A.swift","line":1,"message":"m","kind":"warning"}]}}"#,
        )
        .unwrap();
        assert!(matches!(read_summary(&path), Err(LaneError::Report { .. })));
    }

    #[test]
    fn test_markdown_report_lists_core_once() {
        let summaries =
            vec![SummaryFile::new(&parsed("ios", ExitOutcome::Known(65))), SummaryFile::new(&parsed("tvos", ExitOutcome::Unknown))];
        let infos: Vec<_> = summaries.iter().map(|s| s.build.clone()).collect();
        let diff = split_common(&infos);

        let report = format_markdown_report(&summaries, &diff);

        assert!(report.contains("| ios | 1 | 1 | 1 |"));
        assert!(report.contains("- ios: exit 65"));
        assert!(report.contains("- tvos: unknown"));
        assert!(report.contains("## Core"));
        assert_eq!(report.matches("cannot find 'foo'").count(), 1);
        assert!(report.contains("`/src/ios.swift:3` unused"));
        assert!(report.contains("`/src/tvos.swift:3` unused"));
    }

    #[test]
    fn test_export_markdown_report_writes_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.md");
        let summaries = vec![SummaryFile::new(&parsed("ios", ExitOutcome::Known(0)))];
        let diff = split_common(&[summaries[0].build.clone()]);

        export_markdown_report(&path, &summaries, &diff).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Build Diagnostics Report"));
        assert!(!content.contains("## Core"));
    }
}
