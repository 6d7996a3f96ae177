/// Log normalization
///
/// Build logs captured from fastlane arrive with carriage returns and ANSI
/// color codes. Once the ESC byte has been dropped only the bracketed numeric
/// remnant (`[31m`, `[1;31m`, `[0m`) is left, and that is what gets removed.
use lazy_static::lazy_static;
use log::trace;
use regex::Regex;
use std::borrow::Cow;

const ESC: char = '\u{1b}';

lazy_static! {
    static ref SGR_REMNANT: Regex = Regex::new(r"\[\d+(?:m|;)\d*m?").expect("SGR remnant pattern must compile");
}

/// Strip carriage returns, ESC bytes and SGR remnants from raw log text.
///
/// Line count is preserved and the operation is idempotent. Removing one
/// remnant can expose another (`[1[0m;m`), so removal repeats until nothing
/// matches.
pub fn normalize(raw: &str) -> String {
    let mut normalized: String = raw.chars().filter(|c| *c != '\r' && *c != ESC).collect();
    loop {
        let next = match SGR_REMNANT.replace_all(&normalized, "") {
            Cow::Borrowed(_) => break,
            Cow::Owned(next) => next,
        };
        normalized = next;
    }
    trace!("normalized {} bytes of log text into {} bytes", raw.len(), normalized.len());
    normalized
}
