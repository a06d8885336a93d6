//! Error handling for the wastecam client core
//!
//! Internal fallible paths use this enum with `?`; the transport boundary
//! normalizes every failure into the uniform outcome shape before it can
//! reach a consumer.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error (local image reference, file reads)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// API error (service answered with a non-success status)
    #[error("{0}")]
    Api(String),

    /// Parse error (success status with an undecodable body)
    #[error("{0}")]
    Parse(String),
}
