//! Public SDK surface for docroute.
//!
//! Re-exports the building blocks and wires a router from configuration.

/// Re-export for convenience.
pub use docroute_config as config;
/// Re-export for convenience.
pub use docroute_core as core;
/// Re-export for convenience.
pub use docroute_memory as memory;
/// Re-export for convenience.
pub use docroute_protocol as protocol;
/// Re-export for convenience.
pub use docroute_server as server;

use docroute_config::DocrouteConfig;
use docroute_core::{CoreError, DocumentRouter};
use docroute_memory::{InMemoryContextStore, RetentionPolicy};
use std::sync::Arc;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}

/// Build a router backed by a fresh in-process store sized by `config.memory`.
pub fn router_from_config(config: &DocrouteConfig) -> Result<DocumentRouter, CoreError> {
    let policy = RetentionPolicy {
        max_records: config.memory.max_records,
    };
    let store = InMemoryContextStore::with_policy(policy);
    DocumentRouter::from_config(config, Arc::new(store))
}
