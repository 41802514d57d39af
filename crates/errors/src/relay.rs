//! Text relay errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelayError {
    #[error("text source failed: {message}")]
    Source { message: String },

    #[error("output sink failed: {message}")]
    Sink { message: String },
}

impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        Self::Sink {
            message: err.to_string(),
        }
    }
}

impl UserFacingError for RelayError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::Source { .. } => "relay.source",
            Self::Sink { .. } => "relay.sink",
        })
    }
}
