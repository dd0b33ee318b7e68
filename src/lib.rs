//! # Atlantis YAML Generator Library
//!
//! This library discovers the Terraform projects of a repository and renders
//! the Atlantis repo-level configuration (`atlantis.yaml`) that plans them.
//! It is designed to be used by the `atlantis-yaml-generator` command-line
//! tool, typically from a CI job that runs on every pull request.
//!
//! ## Quick Example
//!
//! ```
//! use atlantis_yaml_generator::config::{Parameters, Settings};
//! use atlantis_yaml_generator::deadline::Deadline;
//! use atlantis_yaml_generator::filesystem::MemoryTree;
//! use atlantis_yaml_generator::phases::orchestrator;
//!
//! let tree = MemoryTree::from_files(["app/main.tf", "db/main.tf", "README.md"]);
//! let settings = Settings::resolve(Parameters {
//!     terraform_base_dir: Some("app".into()),
//!     workflow: Some("terragrunt".to_string()),
//!     pr_filter: Some("false".to_string()),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let config = orchestrator::generate(&settings, &tree, Vec::new(), Deadline::none()).unwrap();
//! assert_eq!(config.projects.len(), 1);
//! assert_eq!(config.projects[0].dir, ".");
//! ```
//!
//! ## Core Concepts
//!
//! - **Settings (`config`)**: Validates the raw parameters of a run and
//!   applies defaults.
//! - **File trees (`filesystem`)**: The `FileTree` trait walks a directory
//!   tree; `OsTree` reads the disk and `MemoryTree` serves tests.
//! - **Change-sets (`github`)**: The files changed by the pull request,
//!   fetched from GitHub or supplied up front.
//! - **Phases (`phases`)**: The pipeline that turns a tree and a change-set
//!   into the final configuration.
//!
//! ## Execution Flow
//!
//! The main entry point is `phases::orchestrator::run`, which executes:
//!
//! 1.  **Folder scan**: Find project roots with the pattern detector.
//! 2.  **Change-set filter**: Keep roots touched by the pull request.
//! 3.  **Workspace resolution**: Decide which workspaces each root plans.
//! 4.  **Project building**: Name one project per root and workspace.
//! 5.  **Project filter**: Apply the include/exclude expressions.
//! 6.  **Assembly**: Attach the repo-wide settings.
//! 7.  **Write**: Render YAML to a file or stdout.

pub mod config;
pub mod deadline;
pub mod defaults;
pub mod error;
pub mod filesystem;
pub mod github;
pub mod output;
pub mod path;
pub mod phases;
pub mod suggestions;

#[cfg(test)]
mod path_proptest;
