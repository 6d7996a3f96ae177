/// Diagnostic extraction from normalized build logs
///
/// xcpretty (as driven by fastlane) prefixes every diagnostic with a glyph:
///
/// ```text
/// [10:02:11]: ▸ ❌  /src/App.swift:10:5: cannot find 'foo' in scope
/// [10:02:11]: ▸ ⚠️  /src/Foo.swift:42:9: initialization of variable 'x' was never used
/// [10:04:40]: ▸     ✗ testLogin, XCTAssertTrue failed
/// ```
///
/// A `MessageExtractor` selects the lines carrying its glyph, drops those
/// matching an ignore keyword and parses the rest into records. Lines that
/// carry the glyph but not the expected grammar are skipped.
use crate::types::{CompilerMessage, MessageKind, UnitTestMessage};
use log::{debug, trace};
use regex::Regex;
use std::collections::BTreeSet;
use thiserror::Error;

/// Default glyph marking compile errors
pub const ERROR_GLYPH: &str = "❌";
/// Default glyph marking compiler warnings
pub const WARNING_GLYPH: &str = "⚠";
/// Default glyph marking failed unit tests
pub const TEST_FAILURE_GLYPH: &str = "✗";

/// A line carried a marker glyph but did not match the diagnostic grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("line does not contain marker '{0}'")]
    MissingMarker(String),

    #[error("expected '<file>:<line>: <message>' after marker in: {0}")]
    MissingLocation(String),

    #[error("expected '<method>, <explanation>' after marker in: {0}")]
    MissingTestMethod(String),

    #[error("line number out of range in: {0}")]
    LineNumber(String),
}

/// Extractor for one diagnostic category
#[derive(Debug, Clone)]
pub struct MessageExtractor {
    glyph: String,
    ignore_keywords: Vec<String>,
    compiler_grammar: Regex,
    test_grammar: Regex,
}

impl MessageExtractor {
    /// Build an extractor for `glyph`, ignoring lines that contain any of
    /// `ignore_keywords` (case-insensitive). Blank keywords are discarded.
    pub fn new<S: AsRef<str>>(glyph: &str, ignore_keywords: &[S]) -> Self {
        let ignore_keywords = ignore_keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        // Emoji glyphs are often followed by a variation selector
        let marker = format!("{}\u{fe0f}?", regex::escape(glyph));
        let compiler_grammar =
            Regex::new(&format!(r"{}\s*(?P<file>[^:]+):(?P<line>\d+)(?::\d+)?:\s*(?P<message>.*)$", marker))
                .expect("compiler diagnostic grammar must compile");
        let test_grammar = Regex::new(&format!(r"{}\s*(?P<method>[^,\s]+)\s*,\s*(?P<explanation>.*)$", marker))
            .expect("test failure grammar must compile");

        Self { glyph: glyph.to_string(), ignore_keywords, compiler_grammar, test_grammar }
    }

    /// Lines carrying the glyph that survive the ignore list
    pub fn candidate_lines<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        text.lines().filter(move |line| line.contains(self.glyph.as_str())).filter(move |line| !self.is_ignored(line))
    }

    fn is_ignored(&self, line: &str) -> bool {
        if self.ignore_keywords.is_empty() {
            return false;
        }
        let lowered = line.to_lowercase();
        self.ignore_keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// Parse one line as a compiler diagnostic of the given kind
    pub fn parse_compiler_line(&self, line: &str, kind: MessageKind) -> Result<CompilerMessage, GrammarError> {
        if !line.contains(self.glyph.as_str()) {
            return Err(GrammarError::MissingMarker(self.glyph.clone()));
        }
        let caps = self.compiler_grammar.captures(line).ok_or_else(|| GrammarError::MissingLocation(line.to_string()))?;

        let file = caps["file"].trim();
        if file.is_empty() {
            return Err(GrammarError::MissingLocation(line.to_string()));
        }
        let line_number: u32 = caps["line"].parse().map_err(|_| GrammarError::LineNumber(line.to_string()))?;

        Ok(CompilerMessage::new(file, line_number, caps["message"].trim(), kind))
    }

    /// Parse one line as a failed unit test
    pub fn parse_test_line(&self, line: &str) -> Result<UnitTestMessage, GrammarError> {
        if !line.contains(self.glyph.as_str()) {
            return Err(GrammarError::MissingMarker(self.glyph.clone()));
        }
        let caps = self.test_grammar.captures(line).ok_or_else(|| GrammarError::MissingTestMethod(line.to_string()))?;

        Ok(UnitTestMessage::new(&caps["method"], caps["explanation"].trim()))
    }

    /// Extract all compiler diagnostics of `kind` from normalized text
    pub fn extract_compiler_messages(&self, text: &str, kind: MessageKind) -> BTreeSet<CompilerMessage> {
        let mut messages = BTreeSet::new();
        for line in self.candidate_lines(text) {
            match self.parse_compiler_line(line, kind) {
                Ok(message) => {
                    messages.insert(message);
                }
                Err(e) => trace!("skipping {} line: {}", kind, e),
            }
        }
        debug!("extracted {} unique {} messages", messages.len(), kind);
        messages
    }

    /// Extract all failed unit tests from normalized text
    pub fn extract_unit_tests(&self, text: &str) -> BTreeSet<UnitTestMessage> {
        let mut tests = BTreeSet::new();
        for line in self.candidate_lines(text) {
            match self.parse_test_line(line) {
                Ok(test) => {
                    tests.insert(test);
                }
                Err(e) => trace!("skipping test line: {}", e),
            }
        }
        debug!("extracted {} unique unit test failures", tests.len());
        tests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_KEYWORDS: &[&str] = &[];

    #[test]
    fn test_parse_warning_example() {
        let extractor = MessageExtractor::new(WARNING_GLYPH, NO_KEYWORDS);
        let message = extractor.parse_compiler_line("⚠️ /src/Foo.swift:42: unused variable 'x'", MessageKind::Warning).unwrap();

        assert_eq!(message, CompilerMessage::new("/src/Foo.swift", 42, "unused variable 'x'", MessageKind::Warning));
    }

    #[test]
    fn test_parse_error_with_column_and_fastlane_prefix() {
        let extractor = MessageExtractor::new(ERROR_GLYPH, NO_KEYWORDS);
        let line = "[10:02:11]: ▸ ❌  /Users/ci/App/Sources/App.swift:10:5: cannot find 'foo' in scope";
        let message = extractor.parse_compiler_line(line, MessageKind::Error).unwrap();

        assert_eq!(message.file, "/Users/ci/App/Sources/App.swift");
        assert_eq!(message.line, 10);
        assert_eq!(message.message, "cannot find 'foo' in scope");
        assert_eq!(message.kind, MessageKind::Error);
    }

    #[test]
    fn test_message_keeps_inner_colons() {
        let extractor = MessageExtractor::new(ERROR_GLYPH, NO_KEYWORDS);
        let message = extractor
            .parse_compiler_line("❌  /src/A.swift:3:1: error: expected ':' after 'case'", MessageKind::Error)
            .unwrap();
        assert_eq!(message.message, "error: expected ':' after 'case'");
    }

    #[test]
    fn test_malformed_compiler_line_is_an_error() {
        let extractor = MessageExtractor::new(ERROR_GLYPH, NO_KEYWORDS);
        let result = extractor.parse_compiler_line("❌  ld: symbol(s) not found for architecture arm64", MessageKind::Error);
        assert!(matches!(result, Err(GrammarError::MissingLocation(_))));
    }

    #[test]
    fn test_line_without_marker_is_an_error() {
        let extractor = MessageExtractor::new(ERROR_GLYPH, NO_KEYWORDS);
        let result = extractor.parse_compiler_line("/src/A.swift:3: boom", MessageKind::Error);
        assert!(matches!(result, Err(GrammarError::MissingMarker(_))));
    }

    #[test]
    fn test_parse_test_failure() {
        let extractor = MessageExtractor::new(TEST_FAILURE_GLYPH, NO_KEYWORDS);
        let test = extractor.parse_test_line("    ✗ testLogin, XCTAssertTrue failed - token was nil").unwrap();

        assert_eq!(test, UnitTestMessage::new("testLogin", "XCTAssertTrue failed - token was nil"));
    }

    #[test]
    fn test_malformed_test_line_is_an_error() {
        let extractor = MessageExtractor::new(TEST_FAILURE_GLYPH, NO_KEYWORDS);
        assert!(matches!(extractor.parse_test_line("✗ 3 tests failed"), Err(GrammarError::MissingTestMethod(_))));
    }

    #[test]
    fn test_extraction_skips_malformed_lines() {
        let text = "❌  /src/A.swift:1:1: first\n❌  ld: linker command failed\nplain line\n❌  /src/B.swift:2: second";
        let extractor = MessageExtractor::new(ERROR_GLYPH, NO_KEYWORDS);
        let errors = extractor.extract_compiler_messages(text, MessageKind::Error);

        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_extraction_deduplicates() {
        let text = "⚠️  /src/Foo.swift:42:9: unused\n⚠️  /src/Foo.swift:42:9: unused\n⚠️  /src/Foo.swift:42:13: unused";
        let extractor = MessageExtractor::new(WARNING_GLYPH, NO_KEYWORDS);
        let warnings = extractor.extract_compiler_messages(text, MessageKind::Warning);

        // Column is not part of the record, so all three lines collapse
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "❌  /src/A.swift:1:1: first\n❌  /src/A.swift:1:1: first\n❌  /src/B.swift:2: second";
        let extractor = MessageExtractor::new(ERROR_GLYPH, NO_KEYWORDS);

        let first = extractor.extract_compiler_messages(text, MessageKind::Error);
        let second = extractor.extract_compiler_messages(text, MessageKind::Error);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_ignore_keywords_are_case_insensitive() {
        let text = "⚠️  /src/Old.swift:5: Deprecated API usage\n⚠️  /src/New.swift:6: unused result";
        let extractor = MessageExtractor::new(WARNING_GLYPH, &["deprecated"]);
        let warnings = extractor.extract_compiler_messages(text, MessageKind::Warning);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings.iter().next().unwrap().file, "/src/New.swift");

        let upper = MessageExtractor::new(WARNING_GLYPH, &["DEPRECATED"]);
        assert_eq!(upper.extract_compiler_messages(text, MessageKind::Warning).len(), 1);
    }

    #[test]
    fn test_blank_ignore_keywords_are_discarded() {
        let text = "❌  /src/A.swift:1: first";
        let extractor = MessageExtractor::new(ERROR_GLYPH, &["", "  "]);
        assert_eq!(extractor.extract_compiler_messages(text, MessageKind::Error).len(), 1);
    }

    #[test]
    fn test_extractors_do_not_cross_categories() {
        let text = "❌  /src/A.swift:1: an error\n⚠️  /src/B.swift:2: a warning\n✗ testC, failed";
        let errors = MessageExtractor::new(ERROR_GLYPH, NO_KEYWORDS).extract_compiler_messages(text, MessageKind::Error);
        let warnings =
            MessageExtractor::new(WARNING_GLYPH, NO_KEYWORDS).extract_compiler_messages(text, MessageKind::Warning);
        let tests = MessageExtractor::new(TEST_FAILURE_GLYPH, NO_KEYWORDS).extract_unit_tests(text);

        assert_eq!(errors.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert_eq!(tests.len(), 1);
    }
}
