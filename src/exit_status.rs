/// Exit status resolution
///
/// fastlane reports the status of failed shell steps as
/// `[hh:mm:ss]: Exit status: <code>`, but the numeric code can lag behind the
/// final `fastlane finished with errors` banner. The banner always wins.
use crate::types::ExitOutcome;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

/// Phrase fastlane prints when a lane fails
pub const FAILURE_PHRASE: &str = "fastlane finished with errors";

lazy_static! {
    static ref EXIT_STATUS: Regex =
        Regex::new(r"\[[0-9]{2}:[0-9]{2}:[0-9]{2}\]: Exit status: ([0-9]+)").expect("exit status pattern must compile");
}

/// Find the numeric exit status reported in the log, ignoring the failure phrase.
///
/// When several markers are present the last one whose code fits in `i64` is used.
pub fn find_exit_code(text: &str) -> Option<i64> {
    EXIT_STATUS
        .captures_iter(text)
        .filter_map(|caps| {
            let digits = caps.get(1)?.as_str();
            match digits.parse() {
                Ok(code) => Some(code),
                Err(e) => {
                    debug!("ignoring exit status '{}': {}", digits, e);
                    None
                }
            }
        })
        .last()
}

/// Whether the log contains the explicit failure phrase
pub fn has_failure_phrase(text: &str) -> bool {
    text.contains(FAILURE_PHRASE)
}

/// Resolve the build outcome from normalized log text
pub fn resolve_exit_status(text: &str) -> ExitOutcome {
    let code = find_exit_code(text);

    let outcome = if has_failure_phrase(text) {
        ExitOutcome::FailedWithErrors
    } else {
        match code {
            Some(code) => ExitOutcome::Known(code),
            None => ExitOutcome::Unknown,
        }
    };

    debug!("exit status marker {:?} resolved to {:?}", code, outcome);
    outcome
}
