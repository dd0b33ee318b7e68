//! Directory traversal behind a small trait
//!
//! The discovery stages never touch `std::fs` directly. They consume a
//! [`FileTree`], which yields a lazy, finite sequence of [`TreeEntry`] values
//! for everything below a root. [`OsTree`] walks the host filesystem with
//! `walkdir`; [`MemoryTree`] holds a set of paths in memory so the pipeline
//! can be exercised without touching the disk.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::path::TERRAFORM_CACHE_DIR;

/// One entry produced by a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path of the entry, joined onto the walk root as given by the caller.
    pub path: PathBuf,
    /// Whether the entry is a directory.
    pub is_dir: bool,
    /// Whether the entry is a regular file. Symlinks and special files are
    /// neither files nor directories.
    pub is_file: bool,
}

impl TreeEntry {
    /// The final path segment as a string, `None` when not valid UTF-8.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

/// Boxed walk iterator returned by [`FileTree::walk`].
pub type Walk<'a> = Box<dyn Iterator<Item = Result<TreeEntry>> + 'a>;

/// A source of directory walks.
///
/// `walk` may be called any number of times; each call starts a fresh
/// traversal. The root itself is not yielded. A root that does not exist or
/// cannot be read yields an error item, as does any directory that cannot
/// be listed during the walk.
pub trait FileTree {
    fn walk<'a>(&'a self, root: &Path) -> Walk<'a>;
}

/// Walks the host filesystem.
///
/// Entries are sorted by file name within each directory and `.terraform`
/// cache directories are never descended into.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsTree;

impl FileTree for OsTree {
    fn walk<'a>(&'a self, root: &Path) -> Walk<'a> {
        let iter = walkdir::WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || entry.file_name() != TERRAFORM_CACHE_DIR)
            .filter(|entry| !matches!(entry, Ok(e) if e.depth() == 0))
            .map(|entry| match entry {
                Ok(entry) => Ok(TreeEntry {
                    is_dir: entry.file_type().is_dir(),
                    is_file: entry.file_type().is_file(),
                    path: entry.into_path(),
                }),
                Err(err) => Err(Error::Discovery {
                    path: err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                    message: err.to_string(),
                }),
            });
        Box::new(iter)
    }
}

/// In-memory directory tree for tests and benchmarks.
///
/// Directories are implied by the files below them; empty directories can be
/// added explicitly. A directory marked unreadable makes any walk that
/// reaches it fail, mimicking a permission error.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    files: BTreeSet<PathBuf>,
    dirs: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
}

impl MemoryTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a list of file paths.
    pub fn from_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut tree = Self::new();
        for file in files {
            tree.add_file(file);
        }
        tree
    }

    /// Add a file
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        self.files.insert(normalize(path.as_ref()));
        self
    }

    /// Add a directory, which may stay empty
    pub fn add_dir<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        self.dirs.insert(normalize(path.as_ref()));
        self
    }

    /// Mark a directory as unreadable
    pub fn add_unreadable_dir<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        let path = normalize(path.as_ref());
        self.dirs.insert(path.clone());
        self.unreadable.insert(path);
        self
    }

    /// Check if the tree holds no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.as_os_str().is_empty()
            || self.dirs.contains(path)
            || self
                .files
                .iter()
                .chain(self.dirs.iter())
                .any(|p| p != path && p.starts_with(path))
    }

    /// Every entry strictly below `root`, keyed by normalized path.
    fn entries_below(&self, root: &Path) -> BTreeMap<PathBuf, bool> {
        let mut entries = BTreeMap::new();
        let candidates = self
            .files
            .iter()
            .map(|p| (p, false))
            .chain(self.dirs.iter().map(|p| (p, true)));

        for (path, is_dir) in candidates {
            if path == root || !path.starts_with(root) {
                continue;
            }
            for ancestor in path.ancestors().skip(1) {
                if ancestor == root || !ancestor.starts_with(root) {
                    break;
                }
                entries.insert(ancestor.to_path_buf(), true);
            }
            entries.entry(path.clone()).or_insert(is_dir);
        }
        entries
    }
}

impl FileTree for MemoryTree {
    fn walk<'a>(&'a self, root: &Path) -> Walk<'a> {
        let normalized_root = normalize(root);
        let not_found = |path: &Path, message: &str| -> Result<TreeEntry> {
            Err(Error::Discovery {
                path: path.display().to_string(),
                message: message.to_string(),
            })
        };

        if self.files.contains(&normalized_root) {
            return Box::new(std::iter::empty());
        }
        if !self.is_dir(&normalized_root) {
            return Box::new(std::iter::once(not_found(
                root,
                "No such file or directory",
            )));
        }
        if self.unreadable.contains(&normalized_root) {
            return Box::new(std::iter::once(not_found(root, "Permission denied")));
        }

        let mut items = Vec::new();
        for (path, is_dir) in self.entries_below(&normalized_root) {
            if path
                .components()
                .any(|c| c.as_os_str() == TERRAFORM_CACHE_DIR)
            {
                continue;
            }
            let full_path = root.join(path.strip_prefix(&normalized_root).unwrap_or(&path));
            if self.unreadable.contains(&path) {
                items.push(not_found(&full_path, "Permission denied"));
                break;
            }
            items.push(Ok(TreeEntry {
                path: full_path,
                is_dir,
                is_file: !is_dir,
            }));
        }
        Box::new(items.into_iter())
    }
}

/// Keep only the normal components of a path, so `./a/b` and `a/b` compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}
