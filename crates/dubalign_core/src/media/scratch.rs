//! Scratch directory management.
//!
//! Intermediate decode artifacts live in uniquely named directories that
//! must be removed on every exit path, success or failure. The
//! [`ScratchSpace`] trait keeps directory creation injectable for tests,
//! and [`ScratchDir`] makes the cleanup structural instead of repeated at
//! each call site.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Provider of uniquely named temporary directories.
pub trait ScratchSpace: Send + Sync {
    /// Create a fresh, uniquely named directory and return its path.
    fn create_unique_dir(&self) -> io::Result<PathBuf>;

    /// Remove a directory previously returned by `create_unique_dir`.
    ///
    /// Removal is best-effort and must never fail the caller.
    fn remove(&self, dir: &Path);
}

/// Default scratch space rooted under a configurable directory.
///
/// Names are never reused across runs: every directory gets a fresh
/// UUID, so concurrent runs cannot collide.
pub struct TempScratch {
    root: PathBuf,
}

impl TempScratch {
    /// Create a scratch space rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory under which unique directories are created.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for TempScratch {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join("dubalign"))
    }
}

impl ScratchSpace for TempScratch {
    fn create_unique_dir(&self) -> io::Result<PathBuf> {
        let dir = self.root.join(format!("scratch-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn remove(&self, dir: &Path) {
        if let Err(e) = fs::remove_dir_all(dir) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!("failed to remove scratch dir {}: {}", dir.display(), e);
            }
        }
    }
}

/// RAII guard over one scratch directory.
///
/// Dropping the guard removes the directory unless [`ScratchDir::keep`]
/// was called, so early returns cannot leak disk.
pub struct ScratchDir<'a> {
    space: &'a dyn ScratchSpace,
    path: PathBuf,
    kept: bool,
}

impl<'a> ScratchDir<'a> {
    /// Acquire a fresh unique directory from `space`.
    pub fn acquire(space: &'a dyn ScratchSpace) -> io::Result<Self> {
        let path = space.create_unique_dir()?;
        Ok(Self {
            space,
            path,
            kept: false,
        })
    }

    /// Path of the guarded directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Detach the directory from the guard, leaving it on disk.
    pub fn keep(mut self) -> PathBuf {
        self.kept = true;
        self.path.clone()
    }
}

impl Drop for ScratchDir<'_> {
    fn drop(&mut self) {
        if !self.kept {
            self.space.remove(&self.path);
        }
    }
}
