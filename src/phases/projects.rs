//! Stage 4: Project Building
//!
//! Expands every (folder, workspace) pair into a named [`Project`], keeping
//! folder order and each folder's workspace order.

use std::collections::HashSet;

use log::info;

use super::{Autoplan, Project, ProjectFolder};
use crate::error::{Error, Result};
use crate::path::project_name;

/// Executes project building.
///
/// `workflow` is passed through to every project untouched. Autoplan is
/// filled in later by assembly.
pub fn execute(folders: &[ProjectFolder], workflow: &str) -> Vec<Project> {
    let projects: Vec<Project> = folders
        .iter()
        .flat_map(|folder| {
            folder.workspaces.iter().map(move |workspace| Project {
                name: project_name(&folder.path, workspace),
                workspace: workspace.clone(),
                workflow: workflow.to_string(),
                dir: folder.path.clone(),
                autoplan: Autoplan::default(),
            })
        })
        .collect();

    info!("Built {} project(s)", projects.len());
    projects
}

/// Fails on the first project name that occurs twice.
///
/// Two distinct (directory, workspace) pairs mapping to one name means
/// discovery produced an ambiguous layout, e.g. `a/b` and `a-b`.
pub fn ensure_unique_names(projects: &[Project]) -> Result<()> {
    let mut seen = HashSet::new();
    for project in projects {
        if !seen.insert(project.name.as_str()) {
            return Err(Error::Discovery {
                path: project.dir.clone(),
                message: format!(
                    "project name '{}' is generated more than once",
                    project.name
                ),
            });
        }
    }
    Ok(())
}
