//! Process exit codes for the lanelog CLI.
//!
//! - 0: Success
//! - 1: The parsed build failed (exit status or failure phrase)
//! - 2: User error (bad arguments, unreadable or invalid configuration)
//! - 3: Report or log file could not be read or written
//! - 4: Webhook delivery failed
//! - 5: Pull request lookup failed

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// The summarized build reported a failure.
pub const BUILD_FAILED: i32 = 1;

/// User error: bad arguments or invalid configuration.
pub const USER_ERROR: i32 = 2;

/// Log, report or Markdown file I/O failure.
pub const IO_FAILURE: i32 = 3;

/// Webhook post failure.
pub const WEBHOOK_FAILURE: i32 = 4;

/// Pull request lookup failure.
pub const LOOKUP_FAILURE: i32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, BUILD_FAILED, USER_ERROR, IO_FAILURE, WEBHOOK_FAILURE, LOOKUP_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }
}
