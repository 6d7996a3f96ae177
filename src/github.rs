/// Pull request lookup for the branch being reported on
///
/// The notify stage titles its message with the open pull request for the
/// branch, when one is configured.
use crate::error::{LaneError, Result};
use log::debug;
use serde::Deserialize;
use std::time::Duration;

/// Public GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("lanelog/", env!("CARGO_PKG_VERSION"));

/// A branch and the pull request opened from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub title: String,
    pub url: String,
}

impl Branch {
    /// Chat-style link, `<url|title>`
    pub fn link(&self) -> String {
        format!("<{}|{}>", self.url, self.title)
    }
}

/// Resolve a branch name to its pull request
pub trait PullRequestLookup {
    fn pull_request(&self, branch: &str) -> Result<Branch>;
}

#[derive(Deserialize)]
struct PullRequest {
    title: String,
    html_url: String,
}

/// GitHub REST client for one repository
pub struct GitHubClient {
    api_url: String,
    organisation: String,
    repository: String,
    token: Option<String>,
    agent: ureq::Agent,
}

impl GitHubClient {
    pub fn new(api_url: &str, organisation: &str, repository: &str, token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(Duration::from_secs(30)).user_agent(USER_AGENT).build();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            organisation: organisation.to_string(),
            repository: repository.to_string(),
            token,
            agent,
        }
    }

    fn pulls_url(&self) -> String {
        format!("{}/repos/{}/{}/pulls", self.api_url, self.organisation, self.repository)
    }
}

impl PullRequestLookup for GitHubClient {
    fn pull_request(&self, branch: &str) -> Result<Branch> {
        let head = format!("{}:{}", self.organisation, branch);
        debug!("looking up pull request for {}", head);

        let mut request = self
            .agent
            .get(&self.pulls_url())
            .query("state", "open")
            .query("head", &head)
            .set("Accept", "application/vnd.github+json");
        if let Some(ref token) = self.token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        let body = request
            .call()
            .map_err(|e| LaneError::PullRequest(e.to_string()))?
            .into_string()
            .map_err(|e| LaneError::PullRequest(e.to_string()))?;
        let pulls: Vec<PullRequest> =
            serde_json::from_str(&body).map_err(|e| LaneError::PullRequest(format!("unexpected response: {}", e)))?;

        let pull = pulls
            .into_iter()
            .next()
            .ok_or_else(|| LaneError::PullRequest(format!("no open pull request for branch '{}'", branch)))?;

        Ok(Branch { name: branch.to_string(), title: pull.title, url: pull.html_url })
    }
}
