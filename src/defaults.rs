//! Default values for generator settings.
//!
//! This module provides centralized default values used by settings
//! resolution and the CLI, ensuring consistency and avoiding duplication.

pub const AUTOMERGE: &str = "true";
pub const PARALLEL_APPLY: &str = "true";
pub const PARALLEL_PLAN: &str = "true";
pub const TERRAFORM_BASE_DIR: &str = "./";
pub const OUTPUT_TYPE: &str = "file";
pub const OUTPUT_FILE: &str = "atlantis.yaml";
pub const DISCOVERY_MODE: &str = "single-workspace";
pub const PR_FILTER: &str = "true";
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Patterns that trigger autoplan when no list is configured.
pub const WHEN_MODIFIED: [&str; 6] = [
    "**/*.tf",
    "**/*.tfvars",
    "**/*.json",
    "**/*.tpl",
    "**/*.tmpl",
    "**/*.xml",
];

/// Returns the default when-modified list as owned strings.
pub fn when_modified() -> Vec<String> {
    WHEN_MODIFIED.iter().map(|p| p.to_string()).collect()
}
