//! Append-only context store for docroute processing records.

pub mod error;
pub mod model;
pub mod policy;
pub mod store;

/// Memory error type.
pub use error::MemoryError;
/// Memory record model.
pub use model::{MemoryRecord, excerpt};
/// Retention policy.
pub use policy::RetentionPolicy;
/// Context store interface and default in-process implementation.
pub use store::{ContextStore, InMemoryContextStore};
