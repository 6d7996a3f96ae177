use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Get the default configuration file location
/// Uses platform-specific config directories:
/// - Linux: ~/.config/lanelog/config.toml
/// - macOS: ~/Library/Application Support/lanelog/config.toml
/// - Windows: %APPDATA%/lanelog/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("lanelog").join("config.toml"))
}

#[derive(Parser, Debug, Clone)]
#[command(name = "lanelog")]
#[command(about = "Summarize fastlane build logs and compare diagnostics across platforms")]
#[command(version)]
pub struct CliArgs {
    /// Configuration file (default: $LANELOG_CONFIG, then the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override console width for table output (default: auto-detect)
    #[arg(long, global = true, value_name = "COLUMNS")]
    pub console_width: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse one platform's build log and write its snapshot file
    Summarize {
        /// Raw build log to parse
        #[arg(long, value_name = "PATH")]
        log: PathBuf,

        /// Platform label for this log (e.g. ios, android)
        #[arg(long)]
        platform: String,

        /// Snapshot file to write (default: <output_dir>/<platform>.json)
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,

        /// Ignore diagnostics containing these keywords (case-insensitive, comma separated)
        #[arg(long, value_name = "KEYWORD", value_delimiter = ',', num_args = 1..)]
        ignore: Vec<String>,

        /// Skip the diagnostics table on stdout
        #[arg(long)]
        quiet: bool,
    },

    /// Compare two snapshot files and report common and platform-specific diagnostics
    Compare {
        /// The two snapshot files written by `summarize`
        #[arg(value_name = "REPORT", num_args = 2, required = true)]
        reports: Vec<PathBuf>,

        /// Also write a Markdown report to this path
        #[arg(long, value_name = "PATH")]
        markdown: Option<PathBuf>,
    },

    /// Post the comparison of one or two snapshot files to a chat webhook
    Notify {
        /// Snapshot files written by `summarize`
        #[arg(value_name = "REPORT", num_args = 1..=2, required = true)]
        reports: Vec<PathBuf>,

        /// Incoming-webhook URL (overrides [webhook] url in the config file)
        #[arg(long, value_name = "URL")]
        webhook_url: Option<String>,

        /// Message title, e.g. the branch name
        #[arg(long)]
        title: Option<String>,

        /// Print the message instead of posting it
        #[arg(long)]
        dry_run: bool,

        /// Title the message with this branch's open pull request (needs [github] in the config file)
        #[arg(long)]
        branch: Option<String>,
    },
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        let mut args = CliArgs::parse();

        // Drop blanks left by inputs like "--ignore deprecated,,pods"
        if let Command::Summarize { ref mut ignore, .. } = args.command {
            ignore.retain(|k| !k.trim().is_empty());
        }

        args
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Summarize { platform, .. } if platform.trim().is_empty() => {
                Err("--platform must not be empty".to_string())
            }
            Command::Compare { reports, .. } if reports.len() != 2 => {
                Err(format!("compare needs exactly two reports, got {}", reports.len()))
            }
            _ => Ok(()),
        }
    }
}
