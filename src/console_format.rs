/// Console formatting module - Pure rendering concerns
///
/// This module handles all console output formatting including:
/// - Diagnostics table layout and borders
/// - Color terminal output
/// - Text truncation and padding
/// - The per-platform counts table shown by `compare`
///
/// It accepts snapshots and statistics from the report module and renders
/// them to any `std::io::Write` destination via `TableWriter`.

use crate::report::PlatformStats;
use crate::types::{BuildInformation, ExitOutcome};
use std::io::{self, Write};
use std::sync::OnceLock;
use term::color::Color;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Writer for table output - configurable for color/plain text
pub struct TableWriter<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> TableWriter<W> {
    /// Create a new table writer
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Write formatted text, optionally with color
    fn write_colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        if self.use_colors {
            if let Some(ref mut t) = term::stdout() {
                let _ = t.fg(color);
                let _ = t.write_all(text.as_bytes());
                let _ = t.reset();
                return Ok(());
            }
        }
        write!(self.writer, "{}", text)
    }

    /// Write the table header with platform and exit status
    pub fn write_table_header(&mut self, platform: &str, exit: &ExitOutcome) -> io::Result<()> {
        write!(self.writer, "{}", format_table_header(platform, exit))
    }

    /// Write table footer
    pub fn write_table_footer(&mut self) -> io::Result<()> {
        write!(self.writer, "{}", format_table_footer())
    }

    /// Write one diagnostic row
    pub fn write_message_row(&mut self, cells: [&str; 3], color: Color) -> io::Result<()> {
        let w = get_widths();
        let row = format!(
            "│ {} │ {} │ {} │",
            truncate_with_padding(cells[0], w.kind - 2),
            truncate_with_padding(cells[1], w.location - 2),
            truncate_with_padding(cells[2], w.message - 2)
        );
        self.write_colored(&row, color)?;
        writeln!(self.writer)
    }

    /// Write a whole snapshot as a table: errors, then warnings, then failed tests
    pub fn write_diagnostics_table(&mut self, info: &BuildInformation, exit: &ExitOutcome) -> io::Result<()> {
        self.write_table_header(info.platform(), exit)?;

        if info.is_empty() {
            self.write_message_row(["", "", "no diagnostics"], term::color::GREEN)?;
        }
        for message in info.errors() {
            self.write_message_row(["error", &message.location(), &message.message], term::color::BRIGHT_RED)?;
        }
        for message in info.warnings() {
            self.write_message_row(["warning", &message.location(), &message.message], term::color::YELLOW)?;
        }
        for test in info.unit_tests() {
            self.write_message_row(["test", &test.method, &test.explanation], term::color::MAGENTA)?;
        }

        self.write_table_footer()
    }

    /// Write per-platform counts side by side
    pub fn write_platform_table(&mut self, stats_list: &[PlatformStats]) -> io::Result<()> {
        if stats_list.is_empty() {
            return Ok(());
        }

        let label_width = 18;
        let value_width = 14;
        let total_width = label_width + stats_list.len() * value_width;

        writeln!(self.writer, "\nPlatform Comparison:")?;

        write!(self.writer, "{:<label_width$}", "", label_width = label_width)?;
        for stats in stats_list {
            write!(self.writer, "{:>value_width$}", stats.platform, value_width = value_width)?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "{}", "━".repeat(total_width))?;

        self.write_count_row("Errors", stats_list, |s| s.errors)?;
        self.write_count_row("Warnings", stats_list, |s| s.warnings)?;
        self.write_count_row("Failed tests", stats_list, |s| s.unit_tests)?;

        writeln!(self.writer, "{}", "━".repeat(total_width))?;

        self.write_count_row("Total", stats_list, |s| s.total())?;
        writeln!(self.writer)
    }

    fn write_count_row<F>(&mut self, label: &str, stats_list: &[PlatformStats], get_val: F) -> io::Result<()>
    where
        F: Fn(&PlatformStats) -> usize,
    {
        write!(self.writer, "{:<18}", label)?;
        for stats in stats_list {
            write!(self.writer, "{:>14}", get_val(stats))?;
        }
        writeln!(self.writer)
    }
}

//
// Table Layout and Widths
//

/// Column widths for the 3-column diagnostics table, each including one space of padding per side
#[derive(Debug, Clone, Copy)]
pub struct TableWidths {
    pub kind: usize,
    pub location: usize,
    pub message: usize,
    pub total: usize, // Total table width including borders
}

impl TableWidths {
    pub fn new(terminal_width: usize) -> Self {
        // Borders: │ = 4 characters (1 before each column + 1 at end)
        let borders = 4;
        let available = terminal_width.saturating_sub(borders);

        // "warning" plus padding
        let kind = 11;
        // Paths get roughly two fifths of what is left
        let location = ((available.saturating_sub(kind)) * 2 / 5).max(20);
        let message = available.saturating_sub(kind + location).max(20);

        TableWidths { kind, location, message, total: kind + location + message + borders }
    }
}

static CONSOLE_WIDTH: OnceLock<usize> = OnceLock::new();
static WIDTHS: OnceLock<TableWidths> = OnceLock::new();

/// Override the detected console width (first call wins)
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH.set(width);
}

/// Get console width override, terminal width, or default to 120
fn get_terminal_width() -> usize {
    if let Some(width) = CONSOLE_WIDTH.get() {
        return *width;
    }
    if let Some((Width(w), _)) = terminal_size() { w as usize } else { 120 }
}

/// Get table widths, computed once from the console width
pub fn get_widths() -> &'static TableWidths {
    WIDTHS.get_or_init(|| TableWidths::new(get_terminal_width()))
}

//
// Text Formatting Utilities
//

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let display_w = display_width(s);

    if display_w <= width {
        return format!("{}{}", s, " ".repeat(width - display_w));
    }

    let mut result = String::new();
    let mut current_width = 0;

    // Reserve space for "..."
    let target_width = if width >= 3 { width - 3 } else { width };

    for c in s.chars() {
        let c_width = UnicodeWidthChar::width(c).unwrap_or(1);
        if current_width + c_width > target_width {
            break;
        }
        result.push(c);
        current_width += c_width;
    }

    if width >= 3 {
        result.push_str("...");
        current_width += 3;
    }

    if current_width < width {
        result.push_str(&" ".repeat(width - current_width));
    }

    result
}

//
// Table Header/Footer Rendering
//

/// Format table header as a string
pub fn format_table_header(platform: &str, exit: &ExitOutcome) -> String {
    let w = get_widths();

    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "=".repeat(w.total)));
    output.push_str(&format!("Diagnostics for {} ({})\n", platform, exit));
    output.push_str(&format!("{}\n", "=".repeat(w.total)));

    output.push_str(&format!(
        "┌{:─<k$}┬{:─<l$}┬{:─<m$}┐\n",
        "",
        "",
        "",
        k = w.kind,
        l = w.location,
        m = w.message
    ));
    output.push_str(&format!(
        "│{:^k$}│{:^l$}│{:^m$}│\n",
        "Kind",
        "Location",
        "Message",
        k = w.kind,
        l = w.location,
        m = w.message
    ));
    output.push_str(&format!(
        "├{:─<k$}┼{:─<l$}┼{:─<m$}┤\n",
        "",
        "",
        "",
        k = w.kind,
        l = w.location,
        m = w.message
    ));

    output
}

/// Format table footer as a string
pub fn format_table_footer() -> String {
    let w = get_widths();
    format!("└{:─<k$}┴{:─<l$}┴{:─<m$}┘\n", "", "", "", k = w.kind, l = w.location, m = w.message)
}

/// Print a snapshot's diagnostics table to stdout with colors
pub fn print_diagnostics_table(info: &BuildInformation, exit: &ExitOutcome) {
    let mut writer = TableWriter::new(io::stdout(), true);
    let _ = writer.write_diagnostics_table(info, exit);
}

/// Print per-platform counts to stdout
pub fn print_platform_table(stats_list: &[PlatformStats]) {
    let mut writer = TableWriter::new(io::stdout(), false);
    let _ = writer.write_platform_table(stats_list);
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
