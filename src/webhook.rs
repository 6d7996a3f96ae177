/// Chat webhook delivery
///
/// The notify stage posts the rendered comparison to an incoming-webhook URL
/// (Slack, Mattermost and Teams all accept a JSON body with a `text` field).
use crate::diff::DiffOutcome;
use crate::error::{LaneError, Result};
use crate::github::PullRequestLookup;
use crate::report::{SummaryFile, headline, render_infos, summarize_infos};
use log::debug;
use std::time::Duration;

const USER_AGENT: &str = concat!("lanelog/", env!("CARGO_PKG_VERSION"));

lazy_static::lazy_static! {
    static ref AGENT: ureq::Agent =
        ureq::AgentBuilder::new().timeout(Duration::from_secs(30)).user_agent(USER_AGENT).build();
}

/// Something that can publish rendered report text
pub trait ReportPoster {
    fn post(&self, text: &str) -> Result<()>;
}

/// Incoming-webhook client
pub struct WebhookClient {
    url: String,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl ReportPoster for WebhookClient {
    fn post(&self, text: &str) -> Result<()> {
        debug!("posting {} bytes to webhook", text.len());

        let body = serde_json::json!({ "text": text }).to_string();
        let response = AGENT
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|e| LaneError::Webhook(e.to_string()))?;

        debug!("webhook answered {}", response.status());
        Ok(())
    }
}

/// Compose the chat message: one headline per platform, then the diff details
pub fn format_notification(title: &str, summaries: &[SummaryFile], diff: &DiffOutcome) -> String {
    let mut text = format!("*{}*\n", title);
    for stats in summarize_infos(summaries.iter().map(|s| &s.build)) {
        let failed = summaries
            .iter()
            .find(|s| s.build.platform() == stats.platform)
            .map(|s| s.exit_status.is_failure())
            .unwrap_or(false);
        let marker = if failed || stats.has_failures() { "🔴" } else { "🟢" };
        text.push_str(&format!("{} {}\n", marker, headline(&stats)));
    }
    text.push('\n');
    text.push_str(&render_infos(diff.common.iter().chain(diff.residual.iter())));
    text
}

/// Message title, extended with a link to the branch's pull request when a branch is given
pub fn notification_title(title: &str, branch: Option<&str>, lookup: &dyn PullRequestLookup) -> Result<String> {
    match branch {
        Some(name) => {
            let branch = lookup.pull_request(name)?;
            debug!("branch {} has pull request {}", branch.name, branch.url);
            Ok(format!("{}: {}", title, branch.link()))
        }
        None => Ok(title.to_string()),
    }
}

/// Format and post the notification
pub fn notify(poster: &dyn ReportPoster, title: &str, summaries: &[SummaryFile], diff: &DiffOutcome) -> Result<()> {
    poster.post(&format_notification(title, summaries, diff))
}
