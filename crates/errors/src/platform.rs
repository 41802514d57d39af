//! Platform-specific operation errors

use std::borrow::Cow;

use crate::{LauncherError, UserFacingError};
use thiserror::Error;

/// Errors that can occur during platform-specific operations
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlatformError {
    #[error("filesystem operation failed: {operation} - {message}")]
    FilesystemOperationFailed { operation: String, message: String },

    #[error("process execution failed: {command} - {message}")]
    ProcessExecutionFailed { command: String, message: String },

    #[error("platform capability not available: {capability}")]
    CapabilityUnavailable { capability: String },

    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("permission denied: {operation} - {message}")]
    PermissionDenied { operation: String, message: String },
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CommandNotFound { .. } => Some("Ensure the required tool is on PATH."),
            Self::CapabilityUnavailable { .. } => {
                Some("This operation is not supported on the current platform.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::FilesystemOperationFailed { .. } => "platform.filesystem",
            Self::ProcessExecutionFailed { .. } => "platform.process",
            Self::CapabilityUnavailable { .. } => "platform.capability_unavailable",
            Self::CommandNotFound { .. } => "platform.command_not_found",
            Self::PermissionDenied { .. } => "platform.permission_denied",
        })
    }
}

impl From<PlatformError> for LauncherError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::PermissionDenied { operation, message } => {
                LauncherError::PermissionDenied { operation, message }
            }
            PlatformError::FilesystemOperationFailed { operation, message } => LauncherError::Io {
                operation,
                path: String::new(),
                message,
            },
            PlatformError::ProcessExecutionFailed { command, message } => LauncherError::Io {
                operation: command,
                path: String::new(),
                message,
            },
            PlatformError::CommandNotFound { command } => LauncherError::Io {
                operation: "spawn".to_string(),
                path: command,
                message: "command not found".to_string(),
            },
            PlatformError::CapabilityUnavailable { capability } => LauncherError::Io {
                operation: capability,
                path: String::new(),
                message: "capability unavailable".to_string(),
            },
        }
    }
}
