/// Log parsing pipeline
///
/// Glues normalization, the three category extractors and exit-status
/// resolution into one pure call from raw log text to a [`ParsedLog`].
use crate::error_extract::{ERROR_GLYPH, MessageExtractor, TEST_FAILURE_GLYPH, WARNING_GLYPH};
use crate::exit_status::resolve_exit_status;
use crate::normalize::normalize;
use crate::types::{BuildInformationBuilder, MessageKind, ParsedLog};
use log::debug;

/// Glyphs identifying each diagnostic category
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Markers {
    pub error: String,
    pub warning: String,
    pub test_failure: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            error: ERROR_GLYPH.to_string(),
            warning: WARNING_GLYPH.to_string(),
            test_failure: TEST_FAILURE_GLYPH.to_string(),
        }
    }
}

/// Everything the parser needs besides the log text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub markers: Markers,
    pub ignore_keywords: Vec<String>,
}

/// The three category extractors, built once per options value
pub struct LogParser {
    errors: MessageExtractor,
    warnings: MessageExtractor,
    unit_tests: MessageExtractor,
}

impl LogParser {
    pub fn new(options: &ParseOptions) -> Self {
        let keywords = &options.ignore_keywords;
        Self {
            errors: MessageExtractor::new(&options.markers.error, keywords),
            warnings: MessageExtractor::new(&options.markers.warning, keywords),
            unit_tests: MessageExtractor::new(&options.markers.test_failure, keywords),
        }
    }

    /// Parse one platform's raw log
    pub fn parse(&self, platform: &str, raw: &str) -> ParsedLog {
        let text = normalize(raw);

        let info = BuildInformationBuilder::new(platform)
            .errors(self.errors.extract_compiler_messages(&text, MessageKind::Error))
            .warnings(self.warnings.extract_compiler_messages(&text, MessageKind::Warning))
            .unit_tests(self.unit_tests.extract_unit_tests(&text))
            .build();
        let exit = resolve_exit_status(&text);

        debug!(
            "parsed {} log: {} errors, {} warnings, {} failed tests, {}",
            platform,
            info.errors().len(),
            info.warnings().len(),
            info.unit_tests().len(),
            exit
        );
        ParsedLog { info, exit }
    }
}

/// Parse a raw log with the given options
pub fn parse_log(platform: &str, raw: &str, options: &ParseOptions) -> ParsedLog {
    LogParser::new(options).parse(platform, raw)
}
