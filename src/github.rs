//! Change-set sources
//!
//! The change-set is the list of repository-relative files modified by the
//! pull request under review. It normally comes from the GitHub REST API;
//! it can also be supplied up front, which is how CI systems without API
//! access and the tests drive the generator.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};
use serde::Deserialize;
use url::Url;

use crate::config::{ChangeSetOrigin, PullRequest};
use crate::deadline::Deadline;
use crate::error::{Error, Result};
use crate::path::strip_root;

/// Files returned per page; a shorter page is the last one.
const PAGE_SIZE: usize = 100;

/// Username GitHub Actions checkouts put in front of the token.
const ACCESS_TOKEN_USER: &str = "x-access-token";

/// Produces the change-set of a run.
pub trait ChangeSetSource {
    fn changed_files(&self, deadline: Deadline) -> Result<Vec<String>>;
}

/// A change-set known before the run starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticChangeSet {
    files: Vec<String>,
}

impl StaticChangeSet {
    pub fn new(files: Vec<String>) -> Self {
        Self { files }
    }
}

impl ChangeSetSource for StaticChangeSet {
    fn changed_files(&self, _deadline: Deadline) -> Result<Vec<String>> {
        Ok(self.files.clone())
    }
}

/// The files of a GitHub pull request.
#[derive(Debug, Clone)]
pub struct GithubPullRequest {
    api_url: String,
    owner: String,
    repo: String,
    number: u64,
    token: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestFile {
    filename: String,
}

impl GithubPullRequest {
    pub fn new(pull_request: &PullRequest, token: impl Into<String>) -> Self {
        Self {
            api_url: pull_request.api_url.trim_end_matches('/').to_string(),
            owner: pull_request.owner.clone(),
            repo: pull_request.repo.clone(),
            number: pull_request.number,
            token: token.into(),
        }
    }

    fn page_url(&self, page: usize) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}/files?per_page={}&page={}",
            self.api_url, self.owner, self.repo, self.number, PAGE_SIZE, page
        )
    }

    fn fetch_page(
        &self,
        client: &reqwest::blocking::Client,
        page: usize,
        deadline: Deadline,
    ) -> Result<Vec<PullRequestFile>> {
        deadline.check("change-set fetch")?;
        let url = self.page_url(page);
        let external = |message: String| Error::ExternalService {
            url: url.clone(),
            message,
        };

        let mut request = client
            .get(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(remaining) = deadline.remaining() {
            request = request.timeout(remaining);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                external(format!("request timed out: {}", e))
            } else {
                external(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(external(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .map_err(|e| external(format!("failed to read response body: {}", e)))?;
        serde_json::from_str(&body)
            .map_err(|e| external(format!("malformed response body: {}", e)))
    }
}

impl ChangeSetSource for GithubPullRequest {
    fn changed_files(&self, deadline: Deadline) -> Result<Vec<String>> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| Error::ExternalService {
                url: self.api_url.clone(),
                message: e.to_string(),
            })?;

        let mut files = Vec::new();
        let mut page = 1;
        loop {
            let entries = self.fetch_page(&client, page, deadline)?;
            let count = entries.len();
            debug!("Page {} of pull request files held {} entries", page, count);
            files.extend(entries.into_iter().map(|entry| entry.filename));
            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        info!(
            "Pull request {}/{}#{} changed {} file(s)",
            self.owner,
            self.repo,
            self.number,
            files.len()
        );
        Ok(files)
    }
}

/// Extract the access token embedded in a remote URL such as
/// `https://x-access-token:<token>@github.com/org/repo`.
pub fn token_from_remote_url(remote: &str) -> Option<String> {
    let url = Url::parse(remote.trim()).ok()?;
    if url.username() != ACCESS_TOKEN_USER {
        return None;
    }
    url.password()
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// The `remote.origin.url` of the repository in the working directory.
fn git_remote_url() -> Option<String> {
    let output = Command::new("git")
        .args(["config", "--get", "remote.origin.url"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Directory the change-set paths are relative to, for an absolute base dir.
///
/// The working directory wins when it contains `base_dir`; otherwise the
/// top level of the git checkout holding `base_dir` is used.
pub fn repository_root(base_dir: &Path) -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if strip_root(base_dir, &cwd).is_some() {
            return Some(cwd);
        }
    }
    let output = Command::new("git")
        .arg("-C")
        .arg(base_dir)
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let root = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
    debug!("Repository root of {} is {}", base_dir.display(), root.display());
    Some(root)
}

/// Pick the token for a pull request: explicit first, then the git remote.
pub fn resolve_token(pull_request: &PullRequest) -> Result<String> {
    if let Some(token) = &pull_request.token {
        return Ok(token.clone());
    }
    git_remote_url()
        .as_deref()
        .and_then(token_from_remote_url)
        .ok_or_else(|| {
            Error::config_with_hint(
                "gh-token could not be read from the git remote URL",
                "Pass --gh-token or set the GH_TOKEN environment variable",
            )
        })
}

/// Build the change-set source for a resolved origin.
pub fn source_for(origin: &ChangeSetOrigin) -> Result<Box<dyn ChangeSetSource>> {
    match origin {
        ChangeSetOrigin::Disabled => Ok(Box::new(StaticChangeSet::default())),
        ChangeSetOrigin::Static(files) => Ok(Box::new(StaticChangeSet::new(files.clone()))),
        ChangeSetOrigin::PullRequest(pull_request) => {
            let token = resolve_token(pull_request)?;
            Ok(Box::new(GithubPullRequest::new(pull_request, token)))
        }
    }
}
