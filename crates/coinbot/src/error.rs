//! Error types for bot operations
//!
//! Navigation results are reported as [`crate::navigation::Outcome`] values,
//! so these errors only cover setup problems and malformed user commands.

use crate::api::ApiError;
use thiserror::Error;

/// Bot specific errors
#[derive(Debug, Error)]
pub enum BotError {
    /// Market data client failure outside of event handling
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// User input could not be parsed into a command
    #[error("Command error: {0}")]
    CommandError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;

impl From<anyhow::Error> for BotError {
    fn from(err: anyhow::Error) -> Self {
        BotError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BotError::CommandError("Unknown command: /moon".to_string());
        assert_eq!(err.to_string(), "Command error: Unknown command: /moon");

        let err = BotError::ConfigError("max_retries must be greater than 0".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: max_retries must be greater than 0"
        );
    }

    #[test]
    fn test_api_error_conversion() {
        let err: BotError = ApiError::Status {
            status: 503,
            url: "https://api.coinlore.net/api/global/".to_string(),
        }
        .into();

        assert!(matches!(err, BotError::Api(ApiError::Status { status: 503, .. })));
        assert!(err.to_string().contains("503"));
    }
}
