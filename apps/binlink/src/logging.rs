//! Structured logging integration for events
//!
//! Converts domain events into tracing records with structured fields, so a
//! `--debug` run leaves a JSON log that can be read without the terminal
//! output.

use binlink_events::{AppEvent, GeneralEvent, LauncherEvent, PlatformEvent, RelayEvent};
use tracing::{debug, error, info, warn};

/// Log an `AppEvent` at its own level with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    let source = event.event_source();

    match event {
        AppEvent::General(general) => match general {
            GeneralEvent::Warning { message, context } => {
                warn!(source = source.as_str(), context = ?context, "{message}");
            }
            GeneralEvent::DebugLog { message } => {
                debug!(source = source.as_str(), "{message}");
            }
        },

        AppEvent::Launcher(launcher) => match launcher {
            LauncherEvent::StatusChecked {
                alias,
                target,
                installed,
                detail,
            } => {
                debug!(
                    source = source.as_str(),
                    alias = %alias.display(),
                    target = %target.display(),
                    installed = installed,
                    detail = ?detail,
                    "Launcher status checked"
                );
            }
            LauncherEvent::InstallStarted {
                operation_id,
                alias,
                target,
            } => {
                info!(
                    source = source.as_str(),
                    operation_id = %operation_id,
                    alias = %alias.display(),
                    target = %target.display(),
                    "Launcher install started"
                );
            }
            LauncherEvent::InstallCompleted {
                operation_id,
                alias,
                target,
                duration_ms,
            } => {
                info!(
                    source = source.as_str(),
                    operation_id = %operation_id,
                    alias = %alias.display(),
                    target = %target.display(),
                    duration_ms = duration_ms,
                    "Launcher installed"
                );
            }
            LauncherEvent::InstallFailed {
                operation_id,
                alias,
                failure,
            } => {
                error!(
                    source = source.as_str(),
                    operation_id = %operation_id,
                    alias = %alias.display(),
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Launcher install failed"
                );
            }
        },

        AppEvent::Platform(platform) => match platform {
            PlatformEvent::OperationStarted { context } => {
                debug!(
                    source = source.as_str(),
                    kind = ?context.kind,
                    operation = %context.operation,
                    target = ?context.target,
                    command = ?context.command.as_ref().map(|c| &c.program),
                    "Platform operation started"
                );
            }
            PlatformEvent::OperationCompleted { context, metrics } => {
                debug!(
                    source = source.as_str(),
                    kind = ?context.kind,
                    operation = %context.operation,
                    target = ?context.target,
                    duration_ms = ?metrics.as_ref().and_then(|m| m.duration_ms),
                    exit_code = ?metrics.as_ref().and_then(|m| m.exit_code),
                    "Platform operation completed"
                );
            }
            PlatformEvent::OperationFailed {
                context,
                failure,
                metrics,
            } => {
                error!(
                    source = source.as_str(),
                    kind = ?context.kind,
                    operation = %context.operation,
                    target = ?context.target,
                    code = ?failure.code,
                    message = %failure.message,
                    duration_ms = ?metrics.as_ref().and_then(|m| m.duration_ms),
                    "Platform operation failed"
                );
            }
        },

        AppEvent::Relay(relay) => match relay {
            RelayEvent::StreamStarted { prompt_chars } => {
                debug!(source = source.as_str(), prompt_chars = prompt_chars, "Stream started");
            }
            RelayEvent::StreamCompleted { chunks, bytes } => {
                info!(
                    source = source.as_str(),
                    chunks = chunks,
                    bytes = bytes,
                    "Stream completed"
                );
            }
            RelayEvent::StreamFailed { chunks, failure } => {
                error!(
                    source = source.as_str(),
                    chunks = chunks,
                    code = ?failure.code,
                    message = %failure.message,
                    "Stream failed"
                );
            }
        },
    }
}
