//! Wire protocol types for docroute requests, classifications and results.

mod extraction;
mod format;
mod intent;

pub use extraction::{Extraction, ExtractionResult};
pub use format::FormatTag;
pub use intent::{Classification, IntentLabel};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stored processing record.
pub type RecordId = Uuid;
/// Caller-supplied identifier linking related requests.
pub type ThreadId = String;

/// Error returned when parsing a label from its wire name fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseLabelError {
    /// Which label family was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// A single piece of content submitted for classification and routing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessingRequest {
    /// Raw text content.
    pub content: String,
    /// Optional declared source format.
    #[serde(default)]
    pub format_hint: Option<FormatTag>,
    /// Optional thread/conversation identifier.
    #[serde(default)]
    pub thread_id: Option<ThreadId>,
    /// Optional free-form source label (e.g. "upload", "paste").
    #[serde(default)]
    pub source: Option<String>,
}

impl ProcessingRequest {
    /// Build a request for raw content with no hint or thread.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            format_hint: None,
            thread_id: None,
            source: None,
        }
    }

    /// Attach a thread identifier.
    pub fn with_thread(mut self, thread_id: impl Into<ThreadId>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Attach a declared format hint.
    pub fn with_format_hint(mut self, hint: FormatTag) -> Self {
        self.format_hint = Some(hint);
        self
    }

    /// Attach a source label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Combined outcome of routing one request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouterResult {
    /// Identifier of the record written to the context store.
    pub record_id: RecordId,
    /// Thread the record was filed under, if any.
    pub thread_id: Option<ThreadId>,
    /// Format and intent classification.
    pub classification: Classification,
    /// Handler output.
    pub processing_result: ExtractionResult,
}
