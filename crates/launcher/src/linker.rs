//! Capability for creating the alias link, possibly with elevated privileges

use async_trait::async_trait;
use binlink_errors::{LauncherError, PlatformError};
use binlink_events::EventEmitter;
use binlink_platform::{Platform, PlatformContext};
use std::path::Path;
use std::sync::Arc;

/// Creates or replaces `link_path` as a symlink to `target`, creating the
/// parent directory first.
///
/// Implementations that need administrator rights obtain them through the
/// host's own authorization prompt. A declined prompt is `PermissionDenied`;
/// any other failure is `Io` with the OS message preserved.
#[async_trait]
pub trait PrivilegedFileLinker: Send + Sync {
    async fn link_atomic(
        &self,
        ctx: &PlatformContext,
        target: &Path,
        link_path: &Path,
    ) -> Result<(), LauncherError>;

    /// Short name for diagnostics
    fn name(&self) -> &'static str;
}

/// In-process linker for locations this process can already write
pub struct DirectLinker {
    platform: Arc<Platform>,
}

impl DirectLinker {
    #[must_use]
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }
}

/// Environmental failure, whatever the platform layer called it
fn io_error(err: PlatformError, operation: &str, path: &Path) -> LauncherError {
    let message = match err {
        PlatformError::FilesystemOperationFailed { message, .. }
        | PlatformError::ProcessExecutionFailed { message, .. }
        | PlatformError::PermissionDenied { message, .. } => message,
        other => other.to_string(),
    };
    LauncherError::Io {
        operation: operation.to_string(),
        path: path.display().to_string(),
        message,
    }
}

#[async_trait]
impl PrivilegedFileLinker for DirectLinker {
    async fn link_atomic(
        &self,
        ctx: &PlatformContext,
        target: &Path,
        link_path: &Path,
    ) -> Result<(), LauncherError> {
        let fs = self.platform.filesystem();

        if let Some(parent) = link_path.parent() {
            fs.create_dir_all(ctx, parent)
                .await
                .map_err(|e| io_error(e, "create_dir_all", parent))?;
        }

        fs.symlink_atomic(ctx, target, link_path)
            .await
            .map_err(|e| io_error(e, "symlink", link_path))
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

/// Production linker: in-process when the alias directory is writable,
/// otherwise through the host's elevation mechanism.
pub struct ElevatingLinker {
    platform: Arc<Platform>,
    direct: DirectLinker,
    elevated: Box<dyn PrivilegedFileLinker>,
}

impl ElevatingLinker {
    #[must_use]
    pub fn new(platform: Arc<Platform>, elevated: Box<dyn PrivilegedFileLinker>) -> Self {
        Self {
            direct: DirectLinker::new(Arc::clone(&platform)),
            platform,
            elevated,
        }
    }

    /// Elevation through `osascript` on macOS and `pkexec` elsewhere
    #[must_use]
    pub fn for_host(platform: Arc<Platform>) -> Self {
        #[cfg(target_os = "macos")]
        let elevated: Box<dyn PrivilegedFileLinker> = Box::new(
            crate::elevation::OsascriptLinker::new(Arc::clone(&platform)),
        );
        #[cfg(not(target_os = "macos"))]
        let elevated: Box<dyn PrivilegedFileLinker> = Box::new(
            crate::elevation::PkexecLinker::new(Arc::clone(&platform)),
        );

        Self::new(platform, elevated)
    }
}

#[async_trait]
impl PrivilegedFileLinker for ElevatingLinker {
    async fn link_atomic(
        &self,
        ctx: &PlatformContext,
        target: &Path,
        link_path: &Path,
    ) -> Result<(), LauncherError> {
        let parent = link_path.parent().unwrap_or(Path::new("/"));

        if self.platform.filesystem().is_writable_dir(parent) {
            self.direct.link_atomic(ctx, target, link_path).await
        } else {
            ctx.emit_debug(format!(
                "{} is not writable, requesting elevation via {}",
                parent.display(),
                self.elevated.name()
            ));
            self.elevated.link_atomic(ctx, target, link_path).await
        }
    }

    fn name(&self) -> &'static str {
        "elevating"
    }
}
