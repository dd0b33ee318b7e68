//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_layout(layouts::SINGLE);
//!     fixture.command().args(["-w", "wf", "--pr-filter", "false"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

use atlantis_yaml_generator::phases::Config;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::layouts;
    pub use super::TestFixture;
}

/// Repository layouts, as lists of files, for testing.
#[allow(dead_code)]
pub mod layouts {
    /// Two single-workspace projects plus unrelated files.
    pub const SINGLE: &[&str] = &[
        "app/main.tf",
        "app/variables.tf",
        "db/main.tf",
        "modules/network/outputs.tf",
        "README.md",
    ];

    /// Two multi-workspace projects with per-workspace variables.
    pub const MULTI: &[&str] = &[
        "app/main.tf",
        "app/workspace_vars/t1.tfvars",
        "app/workspace_vars/t2.tfvars",
        "db/main.tf",
        "db/workspace_vars/prod.tfvars",
    ];

    /// A project with a Terraform cache that must be ignored.
    pub const WITH_CACHE: &[&str] = &[
        "app/main.tf",
        "app/.terraform/modules/vpc/main.tf",
    ];
}

/// Environment variables read by the binary, cleared for every command so
/// the developer's or CI's environment cannot leak into a test.
const GENERATOR_ENV: &[&str] = &[
    "AUTOMERGE",
    "PARALLEL_APPLY",
    "PARALLEL_PLAN",
    "TERRAFORM_BASE_DIR",
    "OUTPUT_TYPE",
    "OUTPUT_FILE",
    "WORKFLOW",
    "DISCOVERY_MODE",
    "PATTERN_DETECTOR",
    "WHEN_MODIFIED",
    "EXCLUDED_PROJECTS",
    "INCLUDED_PROJECTS",
    "PR_FILTER",
    "PULL_NUM",
    "BASE_REPO_NAME",
    "BASE_REPO_OWNER",
    "GH_TOKEN",
    "GITHUB_API_URL",
    "CHANGED_FILES",
    "TIMEOUT",
    "LOG_LEVEL",
    "RUST_LOG",
];

/// A test fixture that provides a temporary repository checkout.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_layout(layouts::MULTI)
///     .with_file("shared/main.tf", "");
///
/// fixture.command().args(["-w", "wf", "--pr-filter", "false"]).assert().success();
/// let config = fixture.read_config();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add every file of a layout with empty content.
    pub fn with_layout(self, files: &[&str]) -> Self {
        files
            .iter()
            .fold(self, |fixture, file| fixture.with_file(file, ""))
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the default output file.
    pub fn output_path(&self) -> PathBuf {
        self.temp_dir.path().join("atlantis.yaml")
    }

    /// Parse the written output file.
    #[allow(dead_code)]
    pub fn read_config(&self) -> Config {
        let content =
            std::fs::read_to_string(self.output_path()).expect("Failed to read atlantis.yaml");
        serde_yaml::from_str(&content).expect("atlantis.yaml should be valid")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a command configured to run in this fixture's directory with a
    /// clean generator environment.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("atlantis-yaml-generator");
        cmd.current_dir(self.path());
        for var in GENERATOR_ENV {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd
    }
}

/// Project names of a config, in output order.
#[allow(dead_code)]
pub fn project_names(config: &Config) -> Vec<&str> {
    config.projects.iter().map(|p| p.name.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_layout() {
        let fixture = TestFixture::new().with_layout(layouts::MULTI);
        assert!(fixture.path().join("app/workspace_vars/t1.tfvars").exists());
        assert!(fixture.path().join("db/main.tf").exists());
    }
}
