use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Events for draining a generated text stream to an output sink
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RelayEvent {
    StreamStarted { prompt_chars: usize },

    StreamCompleted { chunks: usize, bytes: usize },

    StreamFailed {
        chunks: usize,
        failure: FailureContext,
    },
}
