//! Source tree traversal.
//! Produces the visited entries lazily and performs no other I/O, so the
//! projection and the file operations live in their own stage.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// A path visited while walking one source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path as discovered, prefixed by the root it was found under
    pub path: PathBuf,
    /// The root argument this entry was discovered under
    pub root: PathBuf,
    pub is_dir: bool,
}

impl WalkEntry {
    pub fn new<P: Into<PathBuf>, R: Into<PathBuf>>(path: P, root: R, is_dir: bool) -> Self {
        Self { path: path.into(), root: root.into(), is_dir }
    }

    /// Path relative to the root; empty for the root itself.
    pub fn relative_path(&self) -> &Path {
        self.path.strip_prefix(&self.root).unwrap_or(&self.path)
    }

    pub fn is_root(&self) -> bool {
        self.relative_path().as_os_str().is_empty()
    }
}

/// Walks `root` depth-first in pre-order, children sorted by file name.
///
/// A root that is a single file yields just that file. Errors such as a
/// missing root are yielded as items; the caller decides when to stop.
pub fn walk<P: AsRef<Path>>(root: P) -> impl Iterator<Item = Result<WalkEntry>> {
    let root = root.as_ref().to_path_buf();
    let entries = WalkDir::new(&root).sort_by_file_name().into_iter();
    entries.map(move |entry| -> Result<WalkEntry> {
        let entry = entry.map_err(Error::WalkError)?;
        Ok(WalkEntry::new(entry.path(), &root, entry.file_type().is_dir()))
    })
}
