//! Stage 3: Workspace Resolution
//!
//! Decides which workspaces each project folder must plan.
//!
//! ## single-workspace
//!
//! Every folder gets exactly the `default` workspace.
//!
//! ## multi-workspace
//!
//! Each folder keeps its per-workspace variables in a directory named after
//! the pattern detector, one `<workspace>.tfvars` file per workspace. For
//! every folder:
//!
//! 1.  **Scope**: if a changed file lies in the folder but outside the
//!     variables directory, shared configuration changed and the scope is
//!     `CrossWorkspace`. Otherwise the scope is `Workspace`.
//! 2.  **Candidates**: every `.tfvars` file under the variables directory is a
//!     candidate workspace named after the file.
//! 3.  **Retention**: without change restriction, or with `CrossWorkspace`
//!     scope, every candidate is kept. With `Workspace` scope only candidates
//!     whose variables file is itself in the change-set are kept.
//!
//! A folder left with no workspaces stays in the output and yields no
//! projects. A walk error in any folder aborts the whole resolution.

use std::path::Path;

use log::{debug, info, warn};

use super::{DiscoveryMode, ProjectFolder, Scope, DEFAULT_WORKSPACE};
use crate::deadline::Deadline;
use crate::error::Result;
use crate::filesystem::FileTree;
use crate::path::{
    in_terraform_cache, is_under, join_slash, relative_slash_path, workspace_from_tfvars,
};

/// Inputs shared by every folder during resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions<'a> {
    pub mode: DiscoveryMode,
    /// Pattern detector; in multi-workspace mode, the variables directory name.
    pub pattern: &'a str,
    pub changed_files: &'a [String],
    /// Narrow workspaces to the change-set.
    pub restrict_to_changes: bool,
    pub deadline: Deadline,
}

/// Determine whether changes to `folder_path` affect one workspace or all.
pub fn project_scope(folder_path: &str, vars_dir: &str, changed_files: &[String]) -> Scope {
    let vars_path = join_slash(folder_path, vars_dir);
    let shared_change = changed_files
        .iter()
        .any(|file| is_under(file, folder_path) && !is_under(file, &vars_path));
    if shared_change {
        Scope::CrossWorkspace
    } else {
        Scope::Workspace
    }
}

/// Candidate workspaces of one folder, as (workspace, variables file path)
/// pairs with paths relative to `base_dir`.
fn candidate_workspaces(
    tree: &dyn FileTree,
    base_dir: &Path,
    vars_path: &str,
    deadline: Deadline,
) -> Result<Vec<(String, String)>> {
    let mut candidates = Vec::new();
    for entry in tree.walk(&base_dir.join(vars_path)) {
        deadline.check("workspace resolution")?;
        let entry = entry?;
        let relative = relative_slash_path(&entry.path, base_dir)?;
        if !entry.is_file || in_terraform_cache(&relative) {
            continue;
        }
        if let Some(workspace) = entry.file_name().and_then(workspace_from_tfvars) {
            candidates.push((workspace.to_string(), relative));
        }
    }
    Ok(candidates)
}

/// Resolve the workspaces of a single multi-workspace folder.
pub fn resolve_folder(
    tree: &dyn FileTree,
    base_dir: &Path,
    folder_path: &str,
    options: &ResolveOptions<'_>,
) -> Result<Vec<String>> {
    let scope = project_scope(folder_path, options.pattern, options.changed_files);
    let vars_path = join_slash(folder_path, options.pattern);
    let candidates = candidate_workspaces(tree, base_dir, &vars_path, options.deadline)?;

    let workspaces: Vec<String> = candidates
        .into_iter()
        .filter(|(_, file)| {
            !options.restrict_to_changes
                || scope == Scope::CrossWorkspace
                || options.changed_files.iter().any(|changed| changed == file)
        })
        .map(|(workspace, _)| workspace)
        .collect();

    debug!(
        "Folder {} has scope {:?}, workspaces {:?}",
        folder_path, scope, workspaces
    );
    Ok(workspaces)
}

/// Executes workspace resolution for every folder.
pub fn execute(
    tree: &dyn FileTree,
    base_dir: &Path,
    folders: Vec<ProjectFolder>,
    options: &ResolveOptions<'_>,
) -> Result<Vec<ProjectFolder>> {
    let mut resolved = Vec::with_capacity(folders.len());

    for mut folder in folders {
        folder.workspaces = match options.mode {
            DiscoveryMode::SingleWorkspace => vec![DEFAULT_WORKSPACE.to_string()],
            DiscoveryMode::MultiWorkspace => {
                resolve_folder(tree, base_dir, &folder.path, options)?
            }
        };
        if folder.workspaces.is_empty() {
            warn!("Project folder {} has no workspaces to plan", folder.path);
        }
        resolved.push(folder);
    }

    let total: usize = resolved.iter().map(|f| f.workspaces.len()).sum();
    info!(
        "Resolved {} workspace(s) across {} folder(s)",
        total,
        resolved.len()
    );
    Ok(resolved)
}
