//! Filesystem operations needed to maintain a command-line alias

use async_trait::async_trait;
use binlink_errors::PlatformError;
use std::path::{Path, PathBuf};

use crate::core::PlatformContext;

/// What sits at a path, without following a final symlink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkInspection {
    /// Nothing at the path
    Missing,
    /// A symbolic link with the given link text
    Symlink(PathBuf),
    /// A regular file, directory, or other non-link entry
    NotSymlink,
    /// The entry could not be inspected (e.g. parent not searchable)
    Unreadable(String),
}

/// Trait for filesystem operations
#[async_trait]
pub trait FilesystemOperations: Send + Sync {
    /// Inspect `path` as a potential symlink. Never fails; absence is data.
    fn inspect_link(&self, path: &Path) -> LinkInspection;

    /// True when the nearest existing ancestor of `path` is writable by this process
    fn is_writable_dir(&self, path: &Path) -> bool;

    /// Create directory and all parent directories
    async fn create_dir_all(&self, ctx: &PlatformContext, path: &Path)
        -> Result<(), PlatformError>;

    /// Create or replace a symlink at `link` pointing to `target` in one rename
    async fn symlink_atomic(
        &self,
        ctx: &PlatformContext,
        target: &Path,
        link: &Path,
    ) -> Result<(), PlatformError>;
}
