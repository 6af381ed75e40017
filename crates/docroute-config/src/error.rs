//! Error types for config loading and validation.

use thiserror::Error;

/// Errors returned while loading or validating docroute config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config layer could not be read from disk.
    #[error("failed to read config layer: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// A config layer is not valid JSON5.
    #[error("failed to parse json5 config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The merged document does not decode into `DocrouteConfig`.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A field is unknown, mistyped or out of range; `path` is prefixed with
    /// the layer label when the problem came from a single layer.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
}
