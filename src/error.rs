//! Error types for the Coachgate service.

use thiserror::Error;

/// Main error type for Coachgate operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client input that failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// An upstream collaborator answered with something unusable
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Coachgate operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
