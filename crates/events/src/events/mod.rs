use serde::{Deserialize, Serialize};

use crate::{EventLevel, EventSource};
use binlink_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureContext {
    /// Stable error code, when the error type provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod general;
pub mod launcher;
pub mod platform;
pub mod relay;

pub use general::*;
pub use launcher::*;
pub use platform::*;
pub use relay::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// CLI launcher status and installation
    Launcher(LauncherEvent),

    /// Platform-specific operation events (filesystem, process operations)
    Platform(PlatformEvent),

    /// Text stream relay to the terminal
    Relay(RelayEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Launcher(_) => EventSource::LAUNCHER,
            Self::Platform(_) => EventSource::PLATFORM,
            Self::Relay(_) => EventSource::RELAY,
        }
    }

    /// Severity of this event
    #[must_use]
    pub fn level(&self) -> EventLevel {
        match self {
            Self::Launcher(LauncherEvent::InstallFailed { .. })
            | Self::Platform(PlatformEvent::OperationFailed { .. })
            | Self::Relay(RelayEvent::StreamFailed { .. }) => EventLevel::Error,

            Self::General(GeneralEvent::Warning { .. }) => EventLevel::Warn,

            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Platform(PlatformEvent::OperationStarted { .. })
            | Self::Launcher(LauncherEvent::StatusChecked { .. }) => EventLevel::Debug,

            _ => EventLevel::Info,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        self.level().into()
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "binlink::events::general",
            Self::Launcher(_) => "binlink::events::launcher",
            Self::Platform(_) => "binlink::events::platform",
            Self::Relay(_) => "binlink::events::relay",
        }
    }
}
