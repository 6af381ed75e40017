//! Memory record model kept by context stores.

use chrono::{DateTime, Utc};
use docroute_protocol::{FormatTag, IntentLabel, RecordId, ThreadId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Immutable log entry for one routed request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    /// Record identifier.
    pub id: RecordId,
    /// Thread linking related records.
    pub thread_id: Option<ThreadId>,
    /// Detected format of the content.
    pub source: FormatTag,
    /// Classified intent of the content.
    pub intent: IntentLabel,
    /// When the record was built.
    pub timestamp: DateTime<Utc>,
    /// Fields the handler extracted.
    pub extracted_values: BTreeMap<String, Value>,
    /// Leading slice of the raw content, bounded by the router's excerpt size.
    pub raw_excerpt: String,
}

/// Take at most `max_chars` characters from `value`.
pub fn excerpt(value: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
