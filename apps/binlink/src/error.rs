//! CLI error handling

use std::fmt;

use binlink_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(binlink_errors::ConfigError),
    /// Launcher or other library error
    Ops(binlink_errors::Error),
    /// Invalid command arguments
    InvalidArguments(String),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => {
                write!(f, "Configuration error: {e}")?;
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
            CliError::Ops(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Ops(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::InvalidArguments(_) => None,
        }
    }
}

impl From<binlink_errors::ConfigError> for CliError {
    fn from(e: binlink_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<binlink_errors::Error> for CliError {
    fn from(e: binlink_errors::Error) -> Self {
        match e {
            binlink_errors::Error::Config(config) => CliError::Config(config),
            other => CliError::Ops(other),
        }
    }
}

impl From<binlink_errors::LauncherError> for CliError {
    fn from(e: binlink_errors::LauncherError) -> Self {
        CliError::Ops(e.into())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binlink_errors::{ConfigError, LauncherError};

    #[test]
    fn test_declined_install_shows_code_and_hint() {
        let err = CliError::from(LauncherError::PermissionDenied {
            operation: "osascript".into(),
            message: "User canceled.".into(),
        });
        let text = err.to_string();

        assert!(text.contains("Code: launcher.permission_denied"));
        assert!(text.contains("Hint:"));
        assert!(!text.contains("Retry:"));
    }

    #[test]
    fn test_config_errors_unwrapped() {
        let err = CliError::from(binlink_errors::Error::from(ConfigError::ParseError {
            message: "expected `=`".into(),
        }));
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error:"));
    }
}
