//! Error types for context store operations.

use docroute_protocol::RecordId;

/// Errors returned by context stores.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// No record with the given id is retained.
    #[error("record not found: {0}")]
    NotFound(RecordId),
    /// A record with the same id was already appended.
    #[error("duplicate record id: {0}")]
    DuplicateRecord(RecordId),
}
