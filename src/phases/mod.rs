//! Implementation of the discovery pipeline stages.
//!
//! ## Overview
//!
//! One run of the generator passes through these stages, each a plain
//! function taking and returning owned values:
//! 1. Folder scan - find project roots under the base directory
//! 2. Change-set filter - keep roots touched by the pull request
//! 3. Workspace resolution - decide which workspaces each root plans
//! 4. Project building - expand (root, workspace) pairs into named projects
//! 5. Project filter - apply include/exclude regular expressions
//! 6. Assembly - wrap projects and global settings into the final config
//! 7. Write - render the config as YAML to a file or stdout
//!
//! Each stage depends only on the previous ones. No state survives between
//! runs, so concurrent runs cannot observe each other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::suggestions::find_similar;

pub mod assemble;
pub mod changes;
pub mod filter;
pub mod orchestrator;
pub mod projects;
pub mod scan;
pub mod workspaces;
pub mod write;

/// Atlantis repo config format version emitted by the generator.
pub const CONFIG_VERSION: u32 = 3;

/// Workspace assigned to every project in single-workspace mode.
pub const DEFAULT_WORKSPACE: &str = "default";

const DISCOVERY_MODES: [&str; 2] = ["single-workspace", "multi-workspace"];

/// Strategy used to recognize project roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryMode {
    /// A project root holds a file matching the pattern detector.
    #[default]
    SingleWorkspace,
    /// A project root holds a directory of `.tfvars` files matching the
    /// pattern detector, one file per workspace.
    MultiWorkspace,
}

impl DiscoveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryMode::SingleWorkspace => "single-workspace",
            DiscoveryMode::MultiWorkspace => "multi-workspace",
        }
    }

    /// Pattern detector used when none is configured.
    pub fn default_pattern(&self) -> &'static str {
        match self {
            DiscoveryMode::SingleWorkspace => "main.tf",
            DiscoveryMode::MultiWorkspace => "workspace_vars",
        }
    }
}

impl fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscoveryMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single-workspace" => Ok(DiscoveryMode::SingleWorkspace),
            "multi-workspace" => Ok(DiscoveryMode::MultiWorkspace),
            other => {
                let hint = match find_similar(other, &DISCOVERY_MODES) {
                    Some(mode) => format!("Did you mean '{}'?", mode),
                    None => "Use 'single-workspace' or 'multi-workspace'".to_string(),
                };
                Err(Error::config_with_hint(
                    format!("discovery mode '{}' not supported", other),
                    hint,
                ))
            }
        }
    }
}

/// Whether a project's changes touch one workspace or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only per-workspace variable files changed.
    Workspace,
    /// Shared configuration changed, so every workspace must be planned.
    CrossWorkspace,
}

/// A discovered project root and the workspaces to generate for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFolder {
    /// Path relative to the base directory, `/`-separated, `.` for the base.
    pub path: String,
    pub workspaces: Vec<String>,
}

impl ProjectFolder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            workspaces: Vec::new(),
        }
    }
}

/// Autoplan settings attached to every project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autoplan {
    pub enabled: bool,
    pub when_modified: Vec<String>,
}

/// One (directory, workspace) planning unit.
///
/// Field order matches the emitted YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub workspace: String,
    pub workflow: String,
    pub dir: String,
    pub autoplan: Autoplan,
}

/// The Atlantis repo-level configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub version: u32,
    pub automerge: bool,
    pub parallel_apply: bool,
    pub parallel_plan: bool,
    pub projects: Vec<Project>,
}
