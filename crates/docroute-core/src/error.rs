//! Error types for the routing core.

use docroute_config::ConfigError;
use docroute_memory::MemoryError;
use thiserror::Error;

/// Errors returned by routing operations.
///
/// Content that cannot be parsed is never an error; it is classified as
/// unknown and reported through validation findings instead.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Request content was empty or whitespace only.
    #[error("request content is empty")]
    EmptyContent,
    /// Context store rejected the record.
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
    /// Configuration failed validation.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// A trigger or keyword could not be compiled into a matcher.
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
}
