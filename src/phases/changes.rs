//! Stage 2: Change-Set Filter
//!
//! Keeps only the project folders that contain at least one file changed by
//! the pull request. Matching is on path segment boundaries, so a change to
//! `app-old/main.tf` does not select the folder `app`.

use std::path::{Component, Path};

use log::{info, warn};

use super::ProjectFolder;
use crate::path::{is_under, strip_root};

/// Whether any changed file lies below `folder_path`.
pub fn touches(folder_path: &str, changed_files: &[String]) -> bool {
    changed_files.iter().any(|file| is_under(file, folder_path))
}

/// Executes the change-set filter.
///
/// Returns the input unchanged when `enabled` is false.
pub fn execute(
    folders: Vec<ProjectFolder>,
    changed_files: &[String],
    enabled: bool,
) -> Vec<ProjectFolder> {
    if !enabled {
        return folders;
    }

    let total = folders.len();
    let retained: Vec<ProjectFolder> = folders
        .into_iter()
        .filter(|folder| touches(&folder.path, changed_files))
        .collect();
    info!(
        "{} of {} project folder(s) touched by the change-set",
        retained.len(),
        total
    );
    retained
}

/// Re-express repository-relative changed files relative to `base_dir`.
///
/// A base directory such as `terraform/` makes discovered folder paths
/// relative to it, so changed files are stripped of that prefix and files
/// outside it are dropped. An absolute base is first made relative to
/// `repo_root`; when it lies outside, the change-set is used as is. A base
/// of `.` leaves the change-set untouched.
pub fn rebase(
    changed_files: Vec<String>,
    base_dir: &Path,
    repo_root: Option<&Path>,
) -> Vec<String> {
    let relative_base = if base_dir.is_absolute() {
        match repo_root.and_then(|root| strip_root(base_dir, root)) {
            Some(relative) => relative,
            None => {
                warn!(
                    "Base dir {} is not inside the repository; changed files are not rebased",
                    base_dir.display()
                );
                return changed_files;
            }
        }
    } else {
        base_dir.to_path_buf()
    };
    let segments: Vec<&str> = relative_base
        .components()
        .filter_map(|c| match c {
            Component::Normal(segment) => segment.to_str(),
            _ => None,
        })
        .collect();
    if segments.is_empty() {
        return changed_files;
    }

    let prefix = format!("{}/", segments.join("/"));
    changed_files
        .into_iter()
        .filter_map(|file| file.strip_prefix(&prefix).map(str::to_string))
        .collect()
}
