//! Error types for eth-event-exporter

use thiserror::Error;

use crate::client::ApiErrorCode;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Network/process-level failure before a usable body was obtained
    #[error("transport error: {0}")]
    Transport(String),

    /// A body was received but is not well-formed JSON
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Caller requested a method with no transport mapping
    #[error("http method not supported: {0}")]
    UnsupportedMethod(String),

    /// The fetch step returned a non-success result; aborts the current run
    #[error("log fetch failed ({code}): {message}")]
    Fetch { code: ApiErrorCode, message: String },

    /// Configuration errors
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config file: {0}")]
    InvalidFile(String),

    #[error("unknown transport backend: {0}")]
    UnknownTransport(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("config file parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
