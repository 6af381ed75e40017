//! Test helpers shared across docroute crates.

pub mod fixtures;
pub mod store;

pub use store::{FailingStore, RecordingStore};
