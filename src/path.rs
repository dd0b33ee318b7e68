//! Path manipulation utilities for project discovery

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Terraform's per-directory cache, never part of a project.
pub const TERRAFORM_CACHE_DIR: &str = ".terraform";

/// Extension of per-workspace variable files.
pub const TFVARS_EXTENSION: &str = ".tfvars";

/// Express `path` relative to `base` with `/` separators.
///
/// Returns `"."` when the two are the same directory. A `path` outside
/// `base`, or one with a segment that is not valid UTF-8, is a discovery
/// error.
pub fn relative_slash_path(path: &Path, base: &Path) -> Result<String> {
    let discovery_error = |message: String| Error::Discovery {
        path: path.display().to_string(),
        message,
    };
    let relative = path.strip_prefix(base).map_err(|_| {
        discovery_error(format!("entry is outside base directory {}", base.display()))
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        if let Component::Normal(segment) = component {
            let segment = segment
                .to_str()
                .ok_or_else(|| discovery_error("path is not valid UTF-8".to_string()))?;
            segments.push(segment);
        }
    }

    if segments.is_empty() {
        Ok(".".to_string())
    } else {
        Ok(segments.join("/"))
    }
}

/// `dir` relative to `root`, `None` when it lies outside.
///
/// The paths are compared as given first, then in canonical form, so a
/// symlinked temp or workspace directory still matches.
pub fn strip_root(dir: &Path, root: &Path) -> Option<PathBuf> {
    if let Ok(rest) = dir.strip_prefix(root) {
        return Some(rest.to_path_buf());
    }
    let dir = dir.canonicalize().ok()?;
    let root = root.canonicalize().ok()?;
    dir.strip_prefix(&root).ok().map(Path::to_path_buf)
}

/// Whether any segment of a `/`-separated relative path is `.terraform`.
pub fn in_terraform_cache(relative: &str) -> bool {
    relative.split('/').any(|segment| segment == TERRAFORM_CACHE_DIR)
}

/// Whether `file` lies strictly below the directory `dir`.
///
/// Matching is on segment boundaries: `app-old/main.tf` is not under `app`.
/// Every non-empty relative path is under `.`.
pub fn is_under(file: &str, dir: &str) -> bool {
    if dir == "." {
        return !file.is_empty();
    }
    file.strip_prefix(dir)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Join a child path onto a `/`-separated relative directory.
pub fn join_slash(dir: &str, child: &str) -> String {
    if dir == "." {
        child.to_string()
    } else {
        format!("{}/{}", dir, child)
    }
}

/// The workspace name a variables file stands for, if it is one.
pub fn workspace_from_tfvars(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(TFVARS_EXTENSION)
        .filter(|stem| !stem.is_empty())
}

/// Derive the project name for a directory and workspace.
///
/// Every `/` in `dir` becomes `-`; the `default` workspace adds nothing,
/// any other workspace is appended after a `-`.
pub fn project_name(dir: &str, workspace: &str) -> String {
    let base = dir.replace('/', "-");
    if workspace == "default" {
        base
    } else {
        format!("{}-{}", base, workspace)
    }
}
