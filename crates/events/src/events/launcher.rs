//! CLI launcher events

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Events emitted while inspecting or installing the command-line alias
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LauncherEvent {
    /// Alias inspected
    StatusChecked {
        alias: PathBuf,
        target: PathBuf,
        installed: bool,
        /// Human readable reason when not installed
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },

    /// Install requested
    InstallStarted {
        operation_id: String,
        alias: PathBuf,
        target: PathBuf,
    },

    /// Alias now resolves to the target
    InstallCompleted {
        operation_id: String,
        alias: PathBuf,
        target: PathBuf,
        duration_ms: u64,
    },

    /// Install failed; the alias is left as it was
    InstallFailed {
        operation_id: String,
        alias: PathBuf,
        failure: FailureContext,
    },
}
