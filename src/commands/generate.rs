//! Generate command implementation
//!
//! The generate command runs the full pipeline:
//! 1. Resolve settings from flags and environment variables
//! 2. Fetch the pull request change-set (or take `--changed-files`)
//! 3. Scan, filter and name the projects
//! 4. Write the rendered configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use atlantis_yaml_generator::config::{Parameters, Settings};
use atlantis_yaml_generator::filesystem::OsTree;
use atlantis_yaml_generator::github;
use atlantis_yaml_generator::output::{summary, OutputConfig};
use atlantis_yaml_generator::phases::orchestrator;
use atlantis_yaml_generator::suggestions::explain;

/// Arguments for the generate command
///
/// Every value is optional at parse time; defaults and required values are
/// handled by settings resolution so the error lists everything missing.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Atlantis automerge setting (true or false)
    #[arg(long, value_name = "BOOL", env = "AUTOMERGE")]
    pub automerge: Option<String>,

    /// Atlantis parallel_apply setting (true or false)
    #[arg(long, value_name = "BOOL", env = "PARALLEL_APPLY")]
    pub parallel_apply: Option<String>,

    /// Atlantis parallel_plan setting (true or false)
    #[arg(long, value_name = "BOOL", env = "PARALLEL_PLAN")]
    pub parallel_plan: Option<String>,

    /// Directory to scan for Terraform projects [default: ./]
    #[arg(short = 'b', long, value_name = "PATH", env = "TERRAFORM_BASE_DIR")]
    pub terraform_base_dir: Option<PathBuf>,

    /// Where to write the configuration: file or stdout [default: file]
    #[arg(long, value_name = "TYPE", env = "OUTPUT_TYPE")]
    pub output_type: Option<String>,

    /// Output file when --output-type is file [default: atlantis.yaml]
    #[arg(short = 'f', long, value_name = "PATH", env = "OUTPUT_FILE")]
    pub output_file: Option<PathBuf>,

    /// Atlantis workflow assigned to every project
    #[arg(short = 'w', long, value_name = "NAME", env = "WORKFLOW")]
    pub workflow: Option<String>,

    /// single-workspace or multi-workspace [default: single-workspace]
    #[arg(short = 'd', long, value_name = "MODE", env = "DISCOVERY_MODE")]
    pub discovery_mode: Option<String>,

    /// Regular expression recognizing project roots [default: main.tf or workspace_vars]
    #[arg(short = 'q', long, value_name = "REGEX", env = "PATTERN_DETECTOR")]
    pub pattern_detector: Option<String>,

    /// Comma-separated globs that trigger autoplan
    #[arg(short = 'm', long, value_name = "GLOBS", env = "WHEN_MODIFIED")]
    pub when_modified: Option<String>,

    /// Drop projects whose name matches this regular expression
    #[arg(short = 'x', long, value_name = "REGEX", env = "EXCLUDED_PROJECTS")]
    pub excluded_projects: Option<String>,

    /// Keep only projects whose name matches this regular expression
    #[arg(short = 'z', long, value_name = "REGEX", env = "INCLUDED_PROJECTS")]
    pub included_projects: Option<String>,

    /// Restrict projects to those touched by the pull request [default: true]
    #[arg(long, value_name = "BOOL", env = "PR_FILTER")]
    pub pr_filter: Option<String>,

    /// Pull request number
    #[arg(short = 'p', long, value_name = "NUMBER", env = "PULL_NUM")]
    pub pull_num: Option<String>,

    /// Repository name
    #[arg(short = 'r', long, value_name = "NAME", env = "BASE_REPO_NAME")]
    pub base_repo_name: Option<String>,

    /// Repository owner
    #[arg(short = 'o', long, value_name = "OWNER", env = "BASE_REPO_OWNER")]
    pub base_repo_owner: Option<String>,

    /// GitHub token; takes precedence over a token in the git remote URL
    #[arg(
        short = 't',
        long,
        value_name = "TOKEN",
        env = "GH_TOKEN",
        hide_env_values = true
    )]
    pub gh_token: Option<String>,

    /// GitHub API base URL [default: https://api.github.com]
    #[arg(long, value_name = "URL", env = "GITHUB_API_URL")]
    pub github_api_url: Option<String>,

    /// Comma-separated changed files; skips the GitHub API
    #[arg(long, value_name = "FILES", env = "CHANGED_FILES")]
    pub changed_files: Option<String>,

    /// Abort the run after this many seconds
    #[arg(long, value_name = "SECONDS", env = "TIMEOUT")]
    pub timeout: Option<u64>,
}

impl From<GenerateArgs> for Parameters {
    fn from(args: GenerateArgs) -> Self {
        Parameters {
            automerge: args.automerge,
            parallel_apply: args.parallel_apply,
            parallel_plan: args.parallel_plan,
            terraform_base_dir: args.terraform_base_dir,
            output_type: args.output_type,
            output_file: args.output_file,
            workflow: args.workflow,
            discovery_mode: args.discovery_mode,
            pattern_detector: args.pattern_detector,
            when_modified: args.when_modified,
            excluded_projects: args.excluded_projects,
            included_projects: args.included_projects,
            pr_filter: args.pr_filter,
            pull_num: args.pull_num,
            base_repo_name: args.base_repo_name,
            base_repo_owner: args.base_repo_owner,
            gh_token: args.gh_token,
            github_api_url: args.github_api_url,
            changed_files: args.changed_files,
            timeout_secs: args.timeout,
        }
    }
}

/// Execute the generate command
pub fn execute(args: GenerateArgs, color: &str) -> Result<()> {
    let output = OutputConfig::from_env_and_flag(color);

    let settings = Settings::resolve(args.into()).map_err(explain)?;
    log::debug!(
        "Scanning {} in {} mode",
        settings.base_dir.display(),
        settings.discovery_mode
    );

    let source = github::source_for(&settings.change_set).map_err(explain)?;
    let config = orchestrator::run(&settings, &OsTree, source.as_ref()).map_err(explain)?;

    eprintln!(
        "{}",
        summary(&output, config.projects.len(), &settings.output)
    );
    Ok(())
}
