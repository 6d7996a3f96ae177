/// Status output on stderr
///
/// Reports and rendered diagnostics go to stdout so they can be piped;
/// everything printed here goes to stderr.
use lazy_static::lazy_static;
use std::io::Write;
use std::sync::Mutex;

lazy_static! {
    static ref STDERR_LOCK: Mutex<()> = Mutex::new(());
}

/// Write `label: msg` to stderr, coloring the label when stderr is a terminal
fn emit(label: &str, color: Option<term::color::Color>, msg: &str) {
    let _guard = STDERR_LOCK.lock();

    let colored = color.is_some_and(|fg| write_colored_label(label, fg));
    if !colored {
        eprint!("{}", label);
    }
    eprintln!(": {}", msg);
}

fn write_colored_label(label: &str, fg: term::color::Color) -> bool {
    let Some(mut t) = term::stderr() else {
        return false;
    };
    if t.fg(fg).is_err() {
        return false;
    }
    let _ = t.attr(term::Attr::Bold);
    let written = write!(t, "{}", label).is_ok();
    let _ = t.reset();
    written
}

/// Print a progress line prefixed with "lanelog"
pub fn status(msg: &str) {
    emit("lanelog", None, msg);
}

/// Print a yellow "warning" line
pub fn print_warning(msg: &str) {
    emit("warning", Some(term::color::BRIGHT_YELLOW), msg);
}

/// Print a red "error" line
pub fn print_error(msg: &str) {
    emit("error", Some(term::color::BRIGHT_RED), msg);
}
