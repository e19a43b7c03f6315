//! Error types.

use thiserror::Error;

/// Errors raised while building widget geometry or classifying a session.
///
/// These indicate a programming mistake rather than bad user input and are
/// surfaced immediately instead of retried.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Missing required handle argument: {0}")]
    MissingArgument(&'static str),
    #[error("Invalid transformation type: {0}")]
    InvalidAction(String),
}

/// Result type for widget operations.
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unknown transform mode: {0}")]
    InvalidMode(String),
}
