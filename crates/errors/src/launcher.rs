//! Launcher installation errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors surfaced by the CLI launcher installer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum LauncherError {
    #[error("permission denied: {operation} - {message}")]
    PermissionDenied { operation: String, message: String },

    #[error("{operation} failed for {path}: {message}")]
    Io {
        operation: String,
        path: String,
        message: String,
    },

    #[error("link verification failed: {alias} points to {actual}, expected {expected}")]
    VerificationFailed {
        alias: String,
        expected: String,
        actual: String,
    },

    #[error("no application bundle encloses {path}")]
    BundleNotFound { path: String },

    #[error("invalid executable location {path}: {reason}")]
    InvalidLocation { path: String, reason: String },
}

impl LauncherError {
    /// True for the user-declined-authorization class of failures
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// True for environmental failures (directory or link creation)
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::VerificationFailed { .. })
    }
}

impl UserFacingError for LauncherError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::PermissionDenied { .. } => {
                Some("Approve the administrator prompt to install the command-line launcher.")
            }
            Self::Io { .. } => Some("Check that the alias directory is on a writable filesystem."),
            Self::VerificationFailed { .. } => {
                Some("Another process replaced the link; run the install again.")
            }
            Self::BundleNotFound { .. } => {
                Some("Run the launcher from inside the packaged application.")
            }
            Self::InvalidLocation { .. } => {
                Some("Use absolute paths for the resources and working directories.")
            }
        }
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::PermissionDenied { .. } => "launcher.permission_denied",
            Self::Io { .. } => "launcher.io",
            Self::VerificationFailed { .. } => "launcher.verification_failed",
            Self::BundleNotFound { .. } => "launcher.bundle_not_found",
            Self::InvalidLocation { .. } => "launcher.invalid_location",
        })
    }
}
