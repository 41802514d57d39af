//! The launcher installer

use binlink_errors::LauncherError;
use binlink_events::{AppEvent, EventEmitter, EventSender, FailureContext, LauncherEvent};
use binlink_platform::{LinkInspection, Platform, PlatformContext};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::linker::{ElevatingLinker, PrivilegedFileLinker};
use crate::location::{AliasPath, ExecutableLocation};
use crate::state::InstallationState;

/// Exposes the embedded executable as a command-line entry point
///
/// Holds no state of its own beyond the two paths; the symlink on disk is the
/// installation state. Concurrent installs are not coordinated; the last
/// writer wins, which is harmless because every writer links the same target.
pub struct LauncherInstaller {
    location: ExecutableLocation,
    alias: AliasPath,
    platform: Arc<Platform>,
    linker: Arc<dyn PrivilegedFileLinker>,
    ctx: PlatformContext,
}

impl LauncherInstaller {
    #[must_use]
    pub fn new(
        location: ExecutableLocation,
        alias: AliasPath,
        platform: Arc<Platform>,
        linker: Arc<dyn PrivilegedFileLinker>,
    ) -> Self {
        Self {
            location,
            alias,
            platform,
            linker,
            ctx: PlatformContext::default(),
        }
    }

    /// Installer wired to the host platform and its elevation mechanism
    #[must_use]
    pub fn for_host(location: ExecutableLocation, alias: AliasPath) -> Self {
        let platform = Arc::new(Platform::current());
        let linker = Arc::new(ElevatingLinker::for_host(Arc::clone(&platform)));
        Self::new(location, alias, platform, linker)
    }

    /// Report progress and failures on `sender`
    #[must_use]
    pub fn with_event_sender(mut self, sender: Option<EventSender>) -> Self {
        self.ctx = PlatformContext::new(sender);
        self
    }

    #[must_use]
    pub fn location(&self) -> &ExecutableLocation {
        &self.location
    }

    #[must_use]
    pub fn alias(&self) -> &AliasPath {
        &self.alias
    }

    /// Current state of the alias, read from the filesystem
    #[must_use]
    pub fn state(&self) -> InstallationState {
        let inspection = self.platform.filesystem().inspect_link(self.alias.as_path());
        InstallationState::from_inspection(inspection, &self.location)
    }

    /// True iff the alias is a symlink whose target is exactly the executable.
    /// A missing alias is `false`, not an error.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.state().is_installed()
    }

    /// Like [`state`](Self::state), also publishing the result as an event
    #[must_use]
    pub fn report_status(&self) -> InstallationState {
        let state = self.state();
        let detail = match &state {
            InstallationState::Installed => None,
            InstallationState::NotInstalled(reason) => Some(reason.to_string()),
        };
        self.ctx.emit(AppEvent::Launcher(LauncherEvent::StatusChecked {
            alias: self.alias.as_path().to_path_buf(),
            target: self.location.as_path().to_path_buf(),
            installed: state.is_installed(),
            detail,
        }));
        state
    }

    /// Create or replace the alias so it points at the executable.
    ///
    /// Safe to repeat: an already-installed alias is replaced by an identical
    /// link. May block on the host's authorization prompt.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` if authorization was declined or failed, `Io` if the
    /// directory or link could not be created, `VerificationFailed` if the
    /// linker reported success but the alias does not resolve afterwards.
    pub async fn install(&self) -> Result<(), LauncherError> {
        let operation_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        self.ctx.emit(AppEvent::Launcher(LauncherEvent::InstallStarted {
            operation_id: operation_id.clone(),
            alias: self.alias.as_path().to_path_buf(),
            target: self.location.as_path().to_path_buf(),
        }));

        let result = self.install_inner().await;

        match &result {
            Ok(()) => {
                self.ctx.emit(AppEvent::Launcher(LauncherEvent::InstallCompleted {
                    operation_id,
                    alias: self.alias.as_path().to_path_buf(),
                    target: self.location.as_path().to_path_buf(),
                    duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                }));
            }
            Err(e) => {
                self.ctx.emit(AppEvent::Launcher(LauncherEvent::InstallFailed {
                    operation_id,
                    alias: self.alias.as_path().to_path_buf(),
                    failure: FailureContext::from_error(e),
                }));
            }
        }

        result
    }

    async fn install_inner(&self) -> Result<(), LauncherError> {
        let alias = self.alias.as_path();

        // Never replace a real directory, and fail before any prompt is shown
        if self.platform.filesystem().inspect_link(alias) == LinkInspection::NotSymlink
            && alias.is_dir()
        {
            return Err(LauncherError::Io {
                operation: "symlink".to_string(),
                path: alias.display().to_string(),
                message: "a directory occupies the alias path".to_string(),
            });
        }

        self.linker
            .link_atomic(&self.ctx, self.location.as_path(), alias)
            .await?;

        match self.state() {
            InstallationState::Installed => Ok(()),
            InstallationState::NotInstalled(reason) => Err(LauncherError::VerificationFailed {
                alias: alias.display().to_string(),
                expected: self.location.to_string(),
                actual: reason.to_string(),
            }),
        }
    }
}
