//! Orchestrator for a complete generator run
//!
//! This module chains the stages into one call. A run either produces the
//! whole configuration or fails with the first error; nothing partial is
//! written.

use log::{debug, info};

use super::workspaces::ResolveOptions;
use super::{assemble, changes, filter, projects, scan, workspaces, write, Config};
use crate::config::Settings;
use crate::deadline::Deadline;
use crate::error::Result;
use crate::filesystem::FileTree;
use crate::github::{self, ChangeSetSource};

/// Run stages 1-6 over an already-fetched change-set.
///
/// `changed_files` are repository-relative paths; they are ignored unless
/// change restriction is enabled.
pub fn generate(
    settings: &Settings,
    tree: &dyn FileTree,
    changed_files: Vec<String>,
    deadline: Deadline,
) -> Result<Config> {
    let changed_files = if settings.restrict_to_changes {
        let repo_root = if settings.base_dir.is_absolute() {
            github::repository_root(&settings.base_dir)
        } else {
            None
        };
        changes::rebase(changed_files, &settings.base_dir, repo_root.as_deref())
    } else {
        Vec::new()
    };
    debug!("Change-set relative to base dir: {:?}", changed_files);

    // Stage 1: Folder scan
    let folders = scan::execute(
        tree,
        &settings.base_dir,
        settings.discovery_mode,
        &settings.pattern_detector,
        deadline,
    )?;

    // Stage 2: Change-set filter
    let folders = changes::execute(folders, &changed_files, settings.restrict_to_changes);

    // Stage 3: Workspace resolution
    let options = ResolveOptions {
        mode: settings.discovery_mode,
        pattern: &settings.pattern_detector,
        changed_files: &changed_files,
        restrict_to_changes: settings.restrict_to_changes,
        deadline,
    };
    let folders = workspaces::execute(tree, &settings.base_dir, folders, &options)?;

    // Stage 4: Project building
    let built = projects::execute(&folders, &settings.workflow);
    projects::ensure_unique_names(&built)?;

    // Stage 5: Project filter
    let kept = filter::execute(
        built,
        &settings.include_projects,
        &settings.exclude_projects,
    )?;

    // Stage 6: Assembly
    let config = assemble::execute(&settings.global, kept)?;
    info!("Generated {} project(s)", config.projects.len());
    Ok(config)
}

/// Execute a complete run: fetch the change-set, generate, and write.
pub fn run(
    settings: &Settings,
    tree: &dyn FileTree,
    source: &dyn ChangeSetSource,
) -> Result<Config> {
    let deadline = Deadline::from_secs(settings.timeout_secs);

    let changed_files = if settings.restrict_to_changes {
        source.changed_files(deadline)?
    } else {
        Vec::new()
    };

    let config = generate(settings, tree, changed_files, deadline)?;

    // Stage 7: Write
    deadline.check("write")?;
    write::execute(&config, &settings.output)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChangeSetOrigin, GlobalSettings, OutputTarget};
    use crate::error::Error;
    use crate::filesystem::MemoryTree;
    use crate::github::StaticChangeSet;
    use crate::phases::DiscoveryMode;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn settings(mode: DiscoveryMode, pattern: &str, restrict: bool) -> Settings {
        Settings {
            base_dir: PathBuf::from("/repo"),
            discovery_mode: mode,
            pattern_detector: pattern.to_string(),
            workflow: "terragrunt".to_string(),
            restrict_to_changes: restrict,
            include_projects: String::new(),
            exclude_projects: String::new(),
            global: GlobalSettings::default(),
            output: OutputTarget::Stdout,
            change_set: ChangeSetOrigin::Disabled,
            timeout_secs: None,
        }
    }

    fn multi_tree() -> MemoryTree {
        MemoryTree::from_files([
            "/repo/app/main.tf",
            "/repo/app/workspace_vars/t1.tfvars",
            "/repo/app/workspace_vars/t2.tfvars",
            "/repo/db/main.tf",
            "/repo/db/workspace_vars/prod.tfvars",
        ])
    }

    fn names(config: &Config) -> Vec<&str> {
        config.projects.iter().map(|p| p.name.as_str()).collect()
    }

    fn files(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_generate_single_workspace() {
        let tree = MemoryTree::from_files([
            "/repo/app/main.tf",
            "/repo/db/main.tf",
            "/repo/README.md",
        ]);
        let s = settings(DiscoveryMode::SingleWorkspace, "main.tf", false);
        let config = generate(&s, &tree, Vec::new(), Deadline::none()).unwrap();

        assert_eq!(names(&config), vec!["app", "db"]);
        for project in &config.projects {
            assert_eq!(project.workspace, "default");
            assert_eq!(project.workflow, "terragrunt");
            assert!(project.autoplan.enabled);
        }
    }

    #[test]
    fn test_generate_multi_workspace_unrestricted() {
        let s = settings(DiscoveryMode::MultiWorkspace, "workspace_vars", false);
        let config = generate(&s, &multi_tree(), Vec::new(), Deadline::none()).unwrap();
        assert_eq!(names(&config), vec!["app-t1", "app-t2", "db-prod"]);
    }

    #[test]
    fn test_generate_multi_workspace_narrowed_by_changes() {
        let s = settings(DiscoveryMode::MultiWorkspace, "workspace_vars", true);
        let changed = files(&["app/workspace_vars/t1.tfvars"]);
        let config = generate(&s, &multi_tree(), changed, Deadline::none()).unwrap();
        assert_eq!(names(&config), vec!["app-t1"]);
    }

    #[test]
    fn test_generate_multi_workspace_widened_by_shared_change() {
        let s = settings(DiscoveryMode::MultiWorkspace, "workspace_vars", true);
        let changed = files(&["app/main.tf"]);
        let config = generate(&s, &multi_tree(), changed, Deadline::none()).unwrap();
        assert_eq!(names(&config), vec!["app-t1", "app-t2"]);
    }

    #[test]
    fn test_generate_applies_project_filter() {
        let mut s = settings(DiscoveryMode::MultiWorkspace, "workspace_vars", false);
        s.include_projects = "^app".to_string();
        s.exclude_projects = "t2$".to_string();
        let config = generate(&s, &multi_tree(), Vec::new(), Deadline::none()).unwrap();
        assert_eq!(names(&config), vec!["app-t1"]);
    }

    #[test]
    fn test_generate_invalid_filter_yields_nothing() {
        let mut s = settings(DiscoveryMode::MultiWorkspace, "workspace_vars", false);
        s.include_projects = "[a-zA-Z".to_string();
        let err = generate(&s, &multi_tree(), Vec::new(), Deadline::none()).unwrap_err();
        assert!(matches!(err, Error::Filter { .. }));
    }

    #[test]
    fn test_generate_rebases_changes_onto_relative_base() {
        let tree = MemoryTree::from_files(["terraform/app/main.tf", "terraform/db/main.tf"]);
        let mut s = settings(DiscoveryMode::SingleWorkspace, "main.tf", true);
        s.base_dir = PathBuf::from("terraform/");
        let changed = files(&["terraform/db/main.tf", "docs/index.md"]);
        let config = generate(&s, &tree, changed, Deadline::none()).unwrap();
        assert_eq!(names(&config), vec!["db"]);
        assert_eq!(config.projects[0].dir, "db");
    }

    #[test]
    fn test_generate_is_idempotent() {
        let s = settings(DiscoveryMode::MultiWorkspace, "workspace_vars", true);
        let changed = files(&["app/workspace_vars/t2.tfvars", "db/main.tf"]);
        let first = generate(&s, &multi_tree(), changed.clone(), Deadline::none()).unwrap();
        let second = generate(&s, &multi_tree(), changed, Deadline::none()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            write::render(&first).unwrap(),
            write::render(&second).unwrap()
        );
    }

    #[test]
    fn test_generate_rejects_bad_boolean() {
        let mut s = settings(DiscoveryMode::SingleWorkspace, "main.tf", false);
        s.global.automerge = "truee".to_string();
        let tree = MemoryTree::from_files(["/repo/app/main.tf"]);
        let err = generate(&s, &tree, Vec::new(), Deadline::none()).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_run_writes_file() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("atlantis.yaml");
        let mut s = settings(DiscoveryMode::SingleWorkspace, "main.tf", true);
        s.output = OutputTarget::File(output.clone());
        let tree = MemoryTree::from_files(["/repo/app/main.tf", "/repo/db/main.tf"]);
        let source = StaticChangeSet::new(files(&["db/variables.tf"]));

        let config = run(&s, &tree, &source).unwrap();

        assert_eq!(names(&config), vec!["db"]);
        let written = std::fs::read_to_string(&output).unwrap();
        let parsed: Config = serde_yaml::from_str(&written).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_run_does_not_write_on_failure() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("atlantis.yaml");
        let mut s = settings(DiscoveryMode::SingleWorkspace, "main.tf", false);
        s.output = OutputTarget::File(output.clone());
        s.exclude_projects = "(".to_string();
        let tree = MemoryTree::from_files(["/repo/app/main.tf"]);

        assert!(run(&s, &tree, &StaticChangeSet::default()).is_err());
        assert!(!output.exists());
    }
}
