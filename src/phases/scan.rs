//! Stage 1: Folder Scan
//!
//! Walks the base directory and collects every project root under the active
//! discovery mode.
//!
//! ## Discovery predicate
//!
//! - **single-workspace**: the entry is a regular file whose name matches
//!   the pattern detector. Symlinks never match.
//! - **multi-workspace**: the entry is a directory whose name matches the
//!   pattern detector.
//!
//! In both modes entries inside a `.terraform` cache directory never match.
//! The project root is the parent directory of the matching entry, relative
//! to the base directory. Several matches under one root collapse into a
//! single folder, and the result is sorted by path.
//!
//! Any walk error aborts the scan; folders found before the error are
//! discarded.

use std::collections::BTreeSet;
use std::path::Path;

use log::{debug, info};
use regex::Regex;

use super::{DiscoveryMode, ProjectFolder};
use crate::deadline::Deadline;
use crate::error::{Error, Result};
use crate::filesystem::{FileTree, TreeEntry};
use crate::path::{in_terraform_cache, relative_slash_path};

/// Compile a pattern detector so it must match a whole entry name.
pub fn compile_detector(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
        Error::config_with_hint(
            format!("invalid pattern detector '{}': {}", pattern, e),
            "The pattern detector is a regular expression matched against file or directory names",
        )
    })
}

/// Whether `entry` marks a project root under `mode`.
///
/// `relative` is the entry path relative to the base directory.
pub fn is_project_anchor(
    entry: &TreeEntry,
    relative: &str,
    mode: DiscoveryMode,
    detector: &Regex,
) -> bool {
    let kind_matches = match mode {
        DiscoveryMode::SingleWorkspace => entry.is_file,
        DiscoveryMode::MultiWorkspace => entry.is_dir,
    };
    kind_matches
        && entry.file_name().is_some_and(|name| detector.is_match(name))
        && !in_terraform_cache(relative)
}

/// Parent directory of a relative path, `.` at the top level.
fn parent_of(relative: &str) -> &str {
    relative.rsplit_once('/').map_or(".", |(parent, _)| parent)
}

/// Executes the folder scan.
pub fn execute(
    tree: &dyn FileTree,
    base_dir: &Path,
    mode: DiscoveryMode,
    pattern: &str,
    deadline: Deadline,
) -> Result<Vec<ProjectFolder>> {
    let detector = compile_detector(pattern)?;
    let mut roots = BTreeSet::new();

    for entry in tree.walk(base_dir) {
        deadline.check("folder scan")?;
        let entry = entry?;
        let relative = relative_slash_path(&entry.path, base_dir)?;

        if is_project_anchor(&entry, &relative, mode, &detector) {
            let root = parent_of(&relative);
            debug!("Project anchor {} found for root {}", relative, root);
            roots.insert(root.to_string());
        }
    }

    info!(
        "Discovered {} project folder(s) under {} ({} mode)",
        roots.len(),
        base_dir.display(),
        mode
    );
    Ok(roots.into_iter().map(ProjectFolder::new).collect())
}
