//! Format handlers and the registry that dispatches to them.

mod email;
mod entities;
mod pdf_text;
mod structured;

pub use email::EmailHandler;
pub use pdf_text::PdfTextHandler;
pub use structured::StructuredDataHandler;

use crate::CoreError;
use docroute_config::HandlersConfig;
use docroute_protocol::{Extraction, ExtractionResult, FormatTag, IntentLabel};
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Validates and extracts fields for one format.
pub trait FormatHandler: Send + Sync {
    /// Format this handler owns.
    fn format(&self) -> FormatTag;

    /// Every field name `extract` may produce.
    fn field_names(&self) -> &'static [&'static str];

    /// Pull fields out of `content`. Parse problems are recorded as
    /// validation errors on the returned extraction.
    fn extract(&self, content: &str, intent: IntentLabel) -> Extraction;

    /// Check extracted fields for the given intent.
    fn validate(&self, extraction: &Extraction, intent: IntentLabel) -> Vec<String>;

    /// Extract, validate and wrap in this handler's result variant.
    fn process(&self, content: &str, intent: IntentLabel) -> ExtractionResult {
        let mut extraction = self.extract(content, intent);
        let findings = self.validate(&extraction, intent);
        extraction.validation_errors.extend(findings);
        ExtractionResult::for_format(self.format(), extraction)
    }
}

/// Thread-safe map from format tag to handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Arc<RwLock<HashMap<FormatTag, Arc<dyn FormatHandler>>>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the structured-data, email and pdf-text handlers.
    pub fn with_defaults(config: &HandlersConfig) -> Result<Self, CoreError> {
        let registry = Self::new();
        registry.register(Arc::new(StructuredDataHandler::new()));
        registry.register(Arc::new(EmailHandler::new(config)?));
        registry.register(Arc::new(PdfTextHandler::new(config)?));
        Ok(registry)
    }

    /// Register a handler under its format, replacing any previous one.
    pub fn register(&self, handler: Arc<dyn FormatHandler>) {
        debug!("registering handler (format={})", handler.format());
        self.handlers.write().insert(handler.format(), handler);
    }

    /// Fetch the handler for a format.
    pub fn get(&self, format: FormatTag) -> Option<Arc<dyn FormatHandler>> {
        self.handlers.read().get(&format).cloned()
    }

    /// Formats with a registered handler.
    pub fn formats(&self) -> Vec<FormatTag> {
        FormatTag::ALL
            .into_iter()
            .filter(|format| self.handlers.read().contains_key(format))
            .collect()
    }

    /// Run the handler for `format`, or report the format as unsupported.
    pub fn process(&self, format: FormatTag, content: &str, intent: IntentLabel) -> ExtractionResult {
        match self.get(format) {
            Some(handler) => handler.process(content, intent),
            None => {
                debug!("no handler registered (format={format})");
                ExtractionResult::unsupported(format)
            }
        }
    }
}

/// Message used for required fields that were not found.
pub(crate) fn missing_field(name: &str) -> String {
    format!("missing required field `{name}`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct UpperHandler;

    impl FormatHandler for UpperHandler {
        fn format(&self) -> FormatTag {
            FormatTag::Unknown
        }

        fn field_names(&self) -> &'static [&'static str] {
            &["upper"]
        }

        fn extract(&self, content: &str, _intent: IntentLabel) -> Extraction {
            let mut extraction = Extraction::default();
            extraction.insert("upper", content.to_uppercase());
            extraction
        }

        fn validate(&self, _extraction: &Extraction, _intent: IntentLabel) -> Vec<String> {
            vec!["always flagged".to_string()]
        }
    }

    #[test]
    fn defaults_cover_known_formats() {
        let registry = HandlerRegistry::with_defaults(&HandlersConfig::default()).expect("registry");
        assert_eq!(
            registry.formats(),
            vec![FormatTag::StructuredData, FormatTag::Email, FormatTag::PdfText]
        );
        assert!(registry.get(FormatTag::Unknown).is_none());
    }

    #[test]
    fn missing_handler_reports_unsupported() {
        let registry = HandlerRegistry::new();
        let result = registry.process(FormatTag::Email, "From: a@example.com", IntentLabel::Other);
        assert_eq!(result, ExtractionResult::unsupported(FormatTag::Email));
        assert_eq!(result.validation_errors(), ["unsupported format: email"]);
    }

    #[test]
    fn registering_a_format_adds_a_table_entry() {
        let registry = HandlerRegistry::new();
        registry.register(Arc::new(UpperHandler));
        let result = registry.process(FormatTag::Unknown, "abc", IntentLabel::Other);
        assert_eq!(result.handler_name(), "unsupported");
        assert_eq!(result.fields()["upper"], "ABC");
        assert_eq!(result.validation_errors(), ["always flagged"]);
    }

    #[test]
    fn extracted_fields_stay_within_their_variant() {
        let registry = HandlerRegistry::with_defaults(&HandlersConfig::default()).expect("registry");
        let samples = [
            (
                FormatTag::StructuredData,
                r#"{"type":"rfq","source":"portal","data":{"rfq_number":"R-1","requested_items":[],"deadline":"soon","contact":{"name":"A"}}}"#,
                IntentLabel::Rfq,
            ),
            (
                FormatTag::Email,
                "From: \"B\" <b@example.com>\nSubject: Urgent quote\nDate: 2024-03-20\n\nref: Q-9 $50.00",
                IntentLabel::Rfq,
            ),
            (
                FormatTag::PdfText,
                "Invoice No: INV-1\nTotal: $10.00",
                IntentLabel::Invoice,
            ),
        ];
        for (format, content, intent) in samples {
            let handler = registry.get(format).expect("handler");
            let result = handler.process(content, intent);
            for name in result.fields().keys() {
                assert!(
                    handler.field_names().contains(&name.as_str()),
                    "{format} leaked field {name}"
                );
            }
        }
    }
}
