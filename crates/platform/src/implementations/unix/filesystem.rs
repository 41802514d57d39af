//! POSIX filesystem operations implementation
//!
//! Link replacement goes through a staging symlink in the destination
//! directory followed by `rename(2)`, which replaces the destination entry
//! atomically. A shell resolving the alias sees either the old link or the
//! new one, never a missing entry.

use async_trait::async_trait;
use binlink_errors::PlatformError;
use binlink_events::{
    AppEvent, EventEmitter, FailureContext, PlatformEvent, PlatformOperationContext, PlatformOperationKind,
    PlatformOperationMetrics,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use uuid::Uuid;

use crate::core::PlatformContext;
use crate::filesystem::{FilesystemOperations, LinkInspection};

/// POSIX implementation of filesystem operations
pub struct UnixFilesystemOperations;

impl UnixFilesystemOperations {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnixFilesystemOperations {
    fn default() -> Self {
        Self::new()
    }
}

fn filesystem_context(
    operation: &str,
    source: Option<&Path>,
    target: &Path,
) -> PlatformOperationContext {
    PlatformOperationContext {
        kind: PlatformOperationKind::Filesystem,
        operation: operation.to_string(),
        target: Some(target.to_path_buf()),
        source: source.map(Path::to_path_buf),
        command: None,
    }
}

fn filesystem_metrics(
    duration: Duration,
    changes: Option<Vec<String>>,
) -> PlatformOperationMetrics {
    PlatformOperationMetrics {
        duration_ms: Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)),
        exit_code: None,
        stdout_bytes: None,
        stderr_bytes: None,
        changes,
    }
}

async fn emit_fs_started(
    ctx: &PlatformContext,
    operation: &str,
    source: Option<&Path>,
    target: &Path,
) {
    ctx.emit_event(AppEvent::Platform(PlatformEvent::OperationStarted {
        context: filesystem_context(operation, source, target),
    }))
    .await;
}

async fn emit_fs_completed(
    ctx: &PlatformContext,
    operation: &str,
    source: Option<&Path>,
    target: &Path,
    changes: Option<Vec<String>>,
    duration: Duration,
) {
    ctx.emit_event(AppEvent::Platform(PlatformEvent::OperationCompleted {
        context: filesystem_context(operation, source, target),
        metrics: Some(filesystem_metrics(duration, changes)),
    }))
    .await;
}

async fn emit_fs_failed(
    ctx: &PlatformContext,
    operation: &str,
    source: Option<&Path>,
    target: &Path,
    error: &PlatformError,
    duration: Duration,
) {
    ctx.emit_event(AppEvent::Platform(PlatformEvent::OperationFailed {
        context: filesystem_context(operation, source, target),
        failure: FailureContext::from_error(error),
        metrics: Some(filesystem_metrics(duration, None)),
    }))
    .await;
}

fn fs_error(operation: &str, path: &Path, err: &std::io::Error) -> PlatformError {
    let message = format!("{}: {err}", path.display());
    match err.kind() {
        ErrorKind::PermissionDenied => PlatformError::PermissionDenied {
            operation: operation.to_string(),
            message,
        },
        _ => PlatformError::FilesystemOperationFailed {
            operation: operation.to_string(),
            message,
        },
    }
}

/// Sibling path used to stage the new link before it is renamed into place
fn staging_path(link: &Path) -> Result<PathBuf, PlatformError> {
    let file_name = link
        .file_name()
        .ok_or_else(|| PlatformError::FilesystemOperationFailed {
            operation: "symlink_atomic".to_string(),
            message: format!("link path has no file name: {}", link.display()),
        })?;
    let staged = format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        Uuid::new_v4().simple()
    );
    Ok(link.with_file_name(staged))
}

#[cfg(unix)]
fn access_writable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string that outlives the call
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
fn access_writable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

/// Stage a symlink next to `link`, then rename it over `link`
#[cfg(unix)]
async fn replace_with_symlink(
    ctx: &PlatformContext,
    target: &Path,
    link: &Path,
) -> Result<(), PlatformError> {
    let staging = staging_path(link)?;

    fs::symlink(target, &staging)
        .await
        .map_err(|e| fs_error("symlink_atomic", &staging, &e))?;

    if let Err(e) = fs::rename(&staging, link).await {
        // The destination is untouched; only the staged link needs removing
        discard_staging(ctx, &staging).await;
        return Err(fs_error("symlink_atomic", link, &e));
    }
    Ok(())
}

/// Remove a staged link, reporting a leftover instead of failing
#[cfg(unix)]
async fn discard_staging(ctx: &PlatformContext, staging: &Path) {
    if let Err(e) = fs::remove_file(staging).await {
        ctx.emit_warning_with_context(
            format!("failed to remove staging link: {e}"),
            staging.display().to_string(),
        );
    }
}

#[cfg(not(unix))]
async fn replace_with_symlink(
    _ctx: &PlatformContext,
    target: &Path,
    link: &Path,
) -> Result<(), PlatformError> {
    staging_path(link)?;
    Err(PlatformError::CapabilityUnavailable {
        capability: format!("symlink {} -> {}", link.display(), target.display()),
    })
}

#[async_trait]
impl FilesystemOperations for UnixFilesystemOperations {
    fn inspect_link(&self, path: &Path) -> LinkInspection {
        match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => match std::fs::read_link(path) {
                Ok(target) => LinkInspection::Symlink(target),
                // Removed between the two calls
                Err(e) if e.kind() == ErrorKind::NotFound => LinkInspection::Missing,
                Err(e) => LinkInspection::Unreadable(e.to_string()),
            },
            Ok(_) => LinkInspection::NotSymlink,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                LinkInspection::Missing
            }
            Err(e) => LinkInspection::Unreadable(e.to_string()),
        }
    }

    fn is_writable_dir(&self, path: &Path) -> bool {
        path.ancestors()
            .filter(|p| !p.as_os_str().is_empty())
            .find(|p| p.exists())
            .is_some_and(access_writable)
    }

    async fn create_dir_all(
        &self,
        ctx: &PlatformContext,
        path: &Path,
    ) -> Result<(), PlatformError> {
        let start = Instant::now();
        emit_fs_started(ctx, "create_dir_all", None, path).await;

        let result = fs::create_dir_all(path)
            .await
            .map_err(|e| fs_error("create_dir_all", path, &e));

        let duration = start.elapsed();

        match &result {
            Ok(()) => {
                emit_fs_completed(ctx, "create_dir_all", None, path, None, duration).await;
            }
            Err(e) => {
                emit_fs_failed(ctx, "create_dir_all", None, path, e, duration).await;
            }
        }

        result
    }

    async fn symlink_atomic(
        &self,
        ctx: &PlatformContext,
        target: &Path,
        link: &Path,
    ) -> Result<(), PlatformError> {
        let start = Instant::now();
        emit_fs_started(ctx, "symlink_atomic", Some(target), link).await;

        let result = replace_with_symlink(ctx, target, link).await;

        let duration = start.elapsed();

        match &result {
            Ok(()) => {
                emit_fs_completed(
                    ctx,
                    "symlink_atomic",
                    Some(target),
                    link,
                    Some(vec![format!("{} -> {}", link.display(), target.display())]),
                    duration,
                )
                .await;
            }
            Err(e) => {
                emit_fs_failed(ctx, "symlink_atomic", Some(target), link, e, duration).await;
            }
        }

        result
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use binlink_events::GeneralEvent;

    #[tokio::test]
    async fn test_symlink_atomic_replaces_existing_link() {
        let dir = tempfile::tempdir().unwrap();
        let ops = UnixFilesystemOperations::new();
        let ctx = PlatformContext::default();
        let link = dir.path().join("tool");

        ops.symlink_atomic(&ctx, Path::new("/old/target"), &link)
            .await
            .unwrap();
        ops.symlink_atomic(&ctx, Path::new("/new/target"), &link)
            .await
            .unwrap();

        assert_eq!(
            ops.inspect_link(&link),
            LinkInspection::Symlink(PathBuf::from("/new/target"))
        );
        // Only the link itself remains in the directory
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_symlink_atomic_replaces_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let ops = UnixFilesystemOperations::new();
        let link = dir.path().join("tool");
        std::fs::write(&link, b"#!/bin/sh\n").unwrap();
        assert_eq!(ops.inspect_link(&link), LinkInspection::NotSymlink);

        ops.symlink_atomic(&PlatformContext::default(), Path::new("/x"), &link)
            .await
            .unwrap();
        assert_eq!(
            ops.inspect_link(&link),
            LinkInspection::Symlink(PathBuf::from("/x"))
        );
    }

    #[tokio::test]
    async fn test_symlink_atomic_onto_directory_cleans_staging() {
        let dir = tempfile::tempdir().unwrap();
        let ops = UnixFilesystemOperations::new();
        let link = dir.path().join("tool");
        std::fs::create_dir(&link).unwrap();
        std::fs::write(link.join("keep"), b"").unwrap();

        let err = ops
            .symlink_atomic(&PlatformContext::default(), Path::new("/x"), &link)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlatformError::FilesystemOperationFailed { .. }
        ));

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("tool")]);
    }

    #[test]
    fn test_inspect_missing_and_under_file() {
        let dir = tempfile::tempdir().unwrap();
        let ops = UnixFilesystemOperations::new();
        assert_eq!(
            ops.inspect_link(&dir.path().join("absent")),
            LinkInspection::Missing
        );

        let file = dir.path().join("file");
        std::fs::write(&file, b"").unwrap();
        assert_eq!(
            ops.inspect_link(&file.join("child")),
            LinkInspection::Missing
        );
    }

    #[test]
    fn test_is_writable_dir_walks_to_existing_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let ops = UnixFilesystemOperations::new();
        assert!(ops.is_writable_dir(&dir.path().join("a/b/c")));
    }

    #[tokio::test]
    async fn test_events_emitted_for_create_dir_all() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = binlink_events::channel();
        let ctx = PlatformContext::new(Some(tx));
        let ops = UnixFilesystemOperations::new();

        ops.create_dir_all(&ctx, &dir.path().join("nested/bin"))
            .await
            .unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::Platform(PlatformEvent::OperationStarted { .. }))
        ));
        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::Platform(PlatformEvent::OperationCompleted { .. }))
        ));
    }

    #[tokio::test]
    async fn test_leftover_staging_link_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = binlink_events::channel();
        let ctx = PlatformContext::new(Some(tx));
        let staging = dir.path().join(".tool.gone.tmp");

        discard_staging(&ctx, &staging).await;

        match rx.recv().await {
            Some(AppEvent::General(GeneralEvent::Warning { context, .. })) => {
                assert_eq!(context, Some(staging.display().to_string()));
            }
            other => panic!("expected a warning, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_discard_staging_removes_link_silently() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = binlink_events::channel();
        let ctx = PlatformContext::new(Some(tx));
        let staging = dir.path().join(".tool.x.tmp");
        std::os::unix::fs::symlink("/x", &staging).unwrap();

        discard_staging(&ctx, &staging).await;
        drop(ctx);

        assert!(std::fs::symlink_metadata(&staging).is_err());
        assert!(rx.recv().await.is_none());
    }
}
