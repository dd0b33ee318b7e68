//! # Run Settings
//!
//! This module turns the raw, string-valued parameters of one invocation
//! into a validated [`Settings`] value. The raw values come from command-line
//! flags or their environment variables; resolving them is the only place
//! where defaults are applied and required values are checked.
//!
//! ## Key Components
//!
//! - **`Parameters`**: every input as the user supplied it, unvalidated.
//! - **`Settings`**: the validated run configuration consumed by the
//!   orchestrator.
//! - **`GlobalSettings`**: the repo-wide Atlantis values. The boolean values
//!   stay strings here and are parsed strictly during assembly.
//!
//! All missing required parameters are reported together in one
//! `Configuration` error.

use std::path::PathBuf;

use crate::defaults;
use crate::error::{Error, Result};
use crate::phases::DiscoveryMode;

/// Raw parameters of one invocation.
///
/// `None` means the parameter was not given at all; defaults are applied by
/// [`Settings::resolve`].
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    pub automerge: Option<String>,
    pub parallel_apply: Option<String>,
    pub parallel_plan: Option<String>,
    pub terraform_base_dir: Option<PathBuf>,
    pub output_type: Option<String>,
    pub output_file: Option<PathBuf>,
    pub workflow: Option<String>,
    pub discovery_mode: Option<String>,
    pub pattern_detector: Option<String>,
    pub when_modified: Option<String>,
    pub excluded_projects: Option<String>,
    pub included_projects: Option<String>,
    pub pr_filter: Option<String>,
    pub pull_num: Option<String>,
    pub base_repo_name: Option<String>,
    pub base_repo_owner: Option<String>,
    pub gh_token: Option<String>,
    pub github_api_url: Option<String>,
    pub changed_files: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Repo-wide Atlantis settings shared by every project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSettings {
    pub automerge: String,
    pub parallel_apply: String,
    pub parallel_plan: String,
    pub when_modified: Vec<String>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            automerge: defaults::AUTOMERGE.to_string(),
            parallel_apply: defaults::PARALLEL_APPLY.to_string(),
            parallel_plan: defaults::PARALLEL_PLAN.to_string(),
            when_modified: defaults::when_modified(),
        }
    }
}

/// Where the rendered configuration goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Stdout,
}

impl OutputTarget {
    /// Build the target from an `--output-type` value and output file.
    pub fn parse(output_type: &str, output_file: PathBuf) -> Result<Self> {
        match output_type {
            "file" => Ok(OutputTarget::File(output_file)),
            "stdout" => Ok(OutputTarget::Stdout),
            other => Err(Error::config_with_hint(
                format!("output type '{}' not supported", other),
                "Use 'file' or 'stdout'",
            )),
        }
    }
}

/// Coordinates of the pull request whose change-set drives the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    /// Explicit token; when absent it is looked up in the git config.
    pub token: Option<String>,
    pub api_url: String,
}

/// Where the change-set comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSetOrigin {
    /// Changes are not consulted; the change-set is empty.
    Disabled,
    /// A change-set supplied up front.
    Static(Vec<String>),
    /// The files of a GitHub pull request.
    PullRequest(PullRequest),
}

/// Validated configuration of one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_dir: PathBuf,
    pub discovery_mode: DiscoveryMode,
    pub pattern_detector: String,
    pub workflow: String,
    pub restrict_to_changes: bool,
    pub include_projects: String,
    pub exclude_projects: String,
    pub global: GlobalSettings,
    pub output: OutputTarget,
    pub change_set: ChangeSetOrigin,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Apply defaults, validate, and check required parameters.
    pub fn resolve(params: Parameters) -> Result<Self> {
        let restrict_to_changes = parse_bool(
            "pr-filter",
            params.pr_filter.as_deref().unwrap_or(defaults::PR_FILTER),
        )?;
        let changed_files = params.changed_files.as_deref().map(parse_list);

        let mut missing = Vec::new();
        let workflow = non_empty(params.workflow);
        if workflow.is_none() {
            missing.push("workflow");
        }

        let pull_num = non_empty(params.pull_num);
        let repo = non_empty(params.base_repo_name);
        let owner = non_empty(params.base_repo_owner);
        if restrict_to_changes && changed_files.is_none() {
            if pull_num.is_none() {
                missing.push("pull-num");
            }
            if repo.is_none() {
                missing.push("base-repo-name");
            }
            if owner.is_none() {
                missing.push("base-repo-owner");
            }
        }
        if !missing.is_empty() {
            return Err(Error::config_with_hint(
                format!("Missing required parameters: {}", missing.join(", ")),
                "Pass them as flags or set the equivalent environment variables (e.g. WORKFLOW, PULL_NUM)",
            ));
        }

        let change_set = match (restrict_to_changes, changed_files) {
            (false, _) => ChangeSetOrigin::Disabled,
            (true, Some(files)) => ChangeSetOrigin::Static(files),
            (true, None) => ChangeSetOrigin::PullRequest(PullRequest {
                owner: owner.unwrap_or_default(),
                repo: repo.unwrap_or_default(),
                number: parse_pull_number(pull_num.as_deref().unwrap_or_default())?,
                token: non_empty(params.gh_token),
                api_url: non_empty(params.github_api_url)
                    .unwrap_or_else(|| defaults::GITHUB_API_URL.to_string()),
            }),
        };

        let discovery_mode: DiscoveryMode = params
            .discovery_mode
            .as_deref()
            .unwrap_or(defaults::DISCOVERY_MODE)
            .parse()?;
        let pattern_detector = non_empty(params.pattern_detector)
            .unwrap_or_else(|| discovery_mode.default_pattern().to_string());

        let output = OutputTarget::parse(
            params
                .output_type
                .as_deref()
                .unwrap_or(defaults::OUTPUT_TYPE),
            params
                .output_file
                .unwrap_or_else(|| PathBuf::from(defaults::OUTPUT_FILE)),
        )?;

        let global = GlobalSettings {
            automerge: params
                .automerge
                .unwrap_or_else(|| defaults::AUTOMERGE.to_string()),
            parallel_apply: params
                .parallel_apply
                .unwrap_or_else(|| defaults::PARALLEL_APPLY.to_string()),
            parallel_plan: params
                .parallel_plan
                .unwrap_or_else(|| defaults::PARALLEL_PLAN.to_string()),
            when_modified: parse_when_modified(params.when_modified.as_deref().unwrap_or(""))?,
        };

        Ok(Self {
            base_dir: params
                .terraform_base_dir
                .unwrap_or_else(|| PathBuf::from(defaults::TERRAFORM_BASE_DIR)),
            discovery_mode,
            pattern_detector,
            workflow: workflow.unwrap_or_default(),
            restrict_to_changes,
            include_projects: params.included_projects.unwrap_or_default(),
            exclude_projects: params.excluded_projects.unwrap_or_default(),
            global,
            output,
            change_set,
            timeout_secs: params.timeout_secs,
        })
    }
}

/// Parse a boolean setting, accepting only `true` and `false`.
pub fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(Error::config_with_hint(
            format!("{} must be 'true' or 'false', got '{}'", name, other),
            format!("Set --{} to true or false", name),
        )),
    }
}

/// Parse the comma-separated when-modified list.
///
/// Entries are trimmed and empty entries dropped. An empty list falls back to
/// the default patterns. Every entry must be a valid glob.
pub fn parse_when_modified(value: &str) -> Result<Vec<String>> {
    let patterns = parse_list(value);
    if patterns.is_empty() {
        return Ok(defaults::when_modified());
    }
    for pattern in &patterns {
        glob::Pattern::new(pattern).map_err(|e| {
            Error::config_with_hint(
                format!("invalid when-modified pattern '{}': {}", pattern, e),
                "Use * for one path segment and ** for any depth",
            )
        })?;
    }
    Ok(patterns)
}

fn parse_pull_number(value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            Error::config(format!(
                "pull-num must be a positive integer, got '{}'",
                value
            ))
        })
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
