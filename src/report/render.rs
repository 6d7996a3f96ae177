//! Text rendering of build snapshots.
//!
//! Each snapshot becomes a Markdown-flavoured block that reads well both in a
//! chat message and in a code-review comment:
//!
//! ```text
//! ## ios
//! ### Errors
//! - ❌ `/src/App.swift:10` cannot find 'foo' in scope
//! ### Warnings
//! - ⚠️ `/src/Foo.swift:42` unused variable 'x'
//! ### Unit test failures
//! - ✗ `testLogin` XCTAssertTrue failed
//! ```
//!
//! Empty categories are omitted. Output order follows the snapshot's sets,
//! so the same snapshot always renders to the same text.

use crate::types::{BuildInformation, CompilerMessage, UnitTestMessage};
use std::fmt::Write;

const ERROR_PREFIX: &str = "❌";
const WARNING_PREFIX: &str = "⚠️";
const TEST_FAILURE_PREFIX: &str = "✗";

fn compiler_line(out: &mut String, prefix: &str, message: &CompilerMessage) {
    let _ = writeln!(out, "- {} `{}` {}", prefix, message.location(), message.message);
}

fn unit_test_line(out: &mut String, test: &UnitTestMessage) {
    let _ = writeln!(out, "- {} `{}` {}", TEST_FAILURE_PREFIX, test.method, test.explanation);
}

/// Render one snapshot
pub fn render_info(info: &BuildInformation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## {}", info.platform());

    if !info.errors().is_empty() {
        out.push_str("### Errors\n");
        for message in info.errors() {
            compiler_line(&mut out, ERROR_PREFIX, message);
        }
    }

    if !info.warnings().is_empty() {
        out.push_str("### Warnings\n");
        for message in info.warnings() {
            compiler_line(&mut out, WARNING_PREFIX, message);
        }
    }

    if !info.unit_tests().is_empty() {
        out.push_str("### Unit test failures\n");
        for test in info.unit_tests() {
            unit_test_line(&mut out, test);
        }
    }

    out
}

/// Render several snapshots separated by blank lines.
///
/// Snapshots without diagnostics are skipped, unless every snapshot is empty,
/// in which case all headers are kept so the reader still sees what was compared.
pub fn render_infos<'a, I>(infos: I) -> String
where
    I: IntoIterator<Item = &'a BuildInformation>,
{
    let infos: Vec<&BuildInformation> = infos.into_iter().collect();
    let all_empty = infos.iter().all(|info| info.is_empty());

    infos
        .into_iter()
        .filter(|info| all_empty || !info.is_empty())
        .map(render_info)
        .collect::<Vec<_>>()
        .join("\n")
}
