/// Configuration resolution module
///
/// This module handles:
/// - Loading the optional TOML configuration file
/// - Merging it with CLI arguments into one explicit `RunConfig`
/// - Resolving default output locations
///
/// Nothing downstream reads the environment or the file system for settings;
/// every component receives the values it needs from `RunConfig`.
use crate::cli::{self, CliArgs, Command};
use crate::error::{LaneError, Result};
use crate::github;
use crate::parser::{Markers, ParseOptions};
use log::debug;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "LANELOG_CONFIG";

/// Token used for pull request lookup when the file sets none
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Contents of the configuration file
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Keywords whose diagnostics are dropped (case-insensitive)
    pub ignore_keywords: Vec<String>,
    /// Glyphs identifying each diagnostic category
    pub markers: Markers,
    /// Directory for snapshot files when `--output` is not given
    pub output_dir: Option<PathBuf>,
    pub webhook: WebhookConfig,
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebhookConfig {
    pub url: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    pub organisation: Option<String>,
    pub repository: Option<String>,
    pub token: Option<String>,
    /// REST endpoint, for GitHub Enterprise
    pub api_url: Option<String>,
}

/// Repository coordinates for pull request lookup
#[derive(Clone, PartialEq)]
pub struct GitHubSettings {
    pub api_url: String,
    pub organisation: String,
    pub repository: String,
    pub token: Option<String>,
}

// Keep the token out of debug logs
impl std::fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("api_url", &self.api_url)
            .field("organisation", &self.organisation)
            .field("repository", &self.repository)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Fully resolved settings for `summarize`
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizeConfig {
    pub log_path: PathBuf,
    pub platform: String,
    pub output_path: PathBuf,
    pub parse: ParseOptions,
    pub show_table: bool,
}

/// Fully resolved settings for `compare`
#[derive(Debug, Clone, PartialEq)]
pub struct CompareConfig {
    pub reports: Vec<PathBuf>,
    pub markdown_path: Option<PathBuf>,
}

/// Fully resolved settings for `notify`
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyConfig {
    pub reports: Vec<PathBuf>,
    /// `None` only for dry runs
    pub webhook_url: Option<String>,
    pub title: String,
    pub dry_run: bool,
    /// Branch whose pull request titles the message
    pub branch: Option<String>,
    pub github: Option<GitHubSettings>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunConfig {
    Summarize(SummarizeConfig),
    Compare(CompareConfig),
    Notify(NotifyConfig),
}

/// Parse configuration file contents
pub fn parse_file_config(path: &Path, contents: &str) -> Result<FileConfig> {
    toml::from_str(contents).map_err(|e| LaneError::Config { path: path.to_path_buf(), message: e.to_string() })
}

/// Load the configuration file.
///
/// An explicitly requested file (flag or environment) must exist; the
/// per-user default is optional.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let env_path = env::var_os(CONFIG_ENV).map(PathBuf::from);
    let (path, required) = match explicit.map(Path::to_path_buf).or(env_path) {
        Some(path) => (path, true),
        None => match cli::default_config_path() {
            Some(path) => (path, false),
            None => return Ok(FileConfig::default()),
        },
    };

    if !required && !path.exists() {
        debug!("no configuration file at {:?}, using defaults", path);
        return Ok(FileConfig::default());
    }

    debug!("loading configuration from {:?}", path);
    let contents = fs::read_to_string(&path).map_err(|e| LaneError::io(&path, e))?;
    parse_file_config(&path, &contents)
}

/// Build a complete RunConfig from CLI arguments and the configuration file
pub fn build_run_config(args: &CliArgs, file: FileConfig) -> Result<RunConfig> {
    args.validate().map_err(LaneError::Usage)?;

    let config = match &args.command {
        Command::Summarize { log, platform, output, ignore, quiet } => {
            let platform = platform.trim().to_string();
            let output_path = match output {
                Some(path) => path.clone(),
                None => file.output_dir.clone().unwrap_or_default().join(snapshot_file_name(&platform)),
            };
            check_markers(&file.markers)?;

            let mut ignore_keywords = file.ignore_keywords;
            ignore_keywords.extend(ignore.iter().cloned());

            RunConfig::Summarize(SummarizeConfig {
                log_path: log.clone(),
                platform,
                output_path,
                parse: ParseOptions { markers: file.markers, ignore_keywords },
                show_table: !quiet,
            })
        }
        Command::Compare { reports, markdown } => {
            RunConfig::Compare(CompareConfig { reports: reports.clone(), markdown_path: markdown.clone() })
        }
        Command::Notify { reports, webhook_url, title, dry_run, branch } => {
            let webhook_url = webhook_url.clone().or(file.webhook.url);
            if webhook_url.is_none() && !dry_run {
                return Err(LaneError::Usage(
                    "No webhook URL. Pass --webhook-url or set [webhook] url in the config file".to_string(),
                ));
            }
            let title = title.clone().or(file.webhook.title).unwrap_or_else(|| "Build diagnostics".to_string());

            let github = match branch {
                Some(_) => Some(github_settings(file.github)?),
                None => None,
            };

            RunConfig::Notify(NotifyConfig {
                reports: reports.clone(),
                webhook_url,
                title,
                dry_run: *dry_run,
                branch: branch.clone(),
                github,
            })
        }
    };

    debug!("resolved configuration: {:?}", config);
    Ok(config)
}

/// `<platform>.json`, with whitespace and path separators replaced by `_`
fn snapshot_file_name(platform: &str) -> String {
    let stem: String =
        platform.chars().map(|c| if c.is_whitespace() || matches!(c, '/' | '\\' | ':') { '_' } else { c }).collect();
    format!("{}.json", stem)
}

fn check_markers(markers: &Markers) -> Result<()> {
    let named = [("error", &markers.error), ("warning", &markers.warning), ("test_failure", &markers.test_failure)];
    match named.iter().find(|(_, glyph)| glyph.trim().is_empty()) {
        Some((name, _)) => Err(LaneError::Usage(format!("[markers] {} must not be blank", name))),
        None => Ok(()),
    }
}

fn github_settings(file: GitHubConfig) -> Result<GitHubSettings> {
    let (Some(organisation), Some(repository)) = (file.organisation, file.repository) else {
        return Err(LaneError::Usage(
            "--branch needs [github] organisation and repository in the config file".to_string(),
        ));
    };

    Ok(GitHubSettings {
        api_url: file.api_url.unwrap_or_else(|| github::DEFAULT_API_URL.to_string()),
        organisation,
        repository,
        token: file.token.or_else(|| env::var(GITHUB_TOKEN_ENV).ok()),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
