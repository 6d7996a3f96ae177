//! Report generation module.
//!
//! This module handles:
//! - Rendering snapshots into deterministic text blocks
//! - Counting diagnostics per platform
//! - Writing and reading per-platform JSON snapshot files
//! - Exporting the Markdown comparison report
//!
//! Console rendering is handled by the console_format module.
//!
//! # Module Organization
//!
//! - `render` - Text block per snapshot
//! - `stats` - Per-platform counts and headlines
//! - `export` - JSON snapshot files and Markdown export

mod export;
mod render;
mod stats;

pub use render::render_infos;

pub use stats::{PlatformStats, headline, platform_stats, summarize_infos};

pub use export::{SummaryFile, export_markdown_report, read_summary, write_summary};
