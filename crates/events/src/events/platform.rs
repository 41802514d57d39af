//! Platform-specific operation events

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Which platform seam an operation went through
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlatformOperationKind {
    Filesystem,
    Process,
}

/// Program and arguments of a spawned process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessCommandDescriptor {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

/// What a platform operation acted on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformOperationContext {
    pub kind: PlatformOperationKind,
    /// Operation name (e.g., `symlink_atomic`, `execute_command`)
    pub operation: String,
    pub target: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub command: Option<ProcessCommandDescriptor>,
}

/// Timing and output sizes collected after an operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformOperationMetrics {
    pub duration_ms: Option<u64>,
    pub exit_code: Option<i32>,
    pub stdout_bytes: Option<u64>,
    pub stderr_bytes: Option<u64>,
    pub changes: Option<Vec<String>>,
}

/// Platform operation events for tracking filesystem and process operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PlatformEvent {
    OperationStarted {
        context: PlatformOperationContext,
    },

    OperationCompleted {
        context: PlatformOperationContext,
        metrics: Option<PlatformOperationMetrics>,
    },

    OperationFailed {
        context: PlatformOperationContext,
        failure: FailureContext,
        metrics: Option<PlatformOperationMetrics>,
    },
}
