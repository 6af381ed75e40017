use crate::FormatTag;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fields and validation findings produced by one handler.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Extraction {
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    #[serde(default)]
    pub validation_errors: Vec<String>,
}

impl Extraction {
    /// Insert a field value.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(name.to_string(), value.into());
    }

    /// Insert a field only when a value is present.
    pub fn insert_opt(&mut self, name: &str, value: Option<impl Into<Value>>) {
        if let Some(value) = value {
            self.insert(name, value);
        }
    }

    /// Record a validation finding.
    pub fn error(&mut self, message: impl Into<String>) {
        self.validation_errors.push(message.into());
    }
}

/// Handler output, tagged by the handler capability that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "handler")]
pub enum ExtractionResult {
    StructuredData(Extraction),
    Email(Extraction),
    PdfText(Extraction),
    /// No handler is registered for the detected format.
    Unsupported(Extraction),
}

impl ExtractionResult {
    /// Wrap an extraction in the variant owned by `format`.
    pub fn for_format(format: FormatTag, extraction: Extraction) -> Self {
        match format {
            FormatTag::StructuredData => ExtractionResult::StructuredData(extraction),
            FormatTag::Email => ExtractionResult::Email(extraction),
            FormatTag::PdfText => ExtractionResult::PdfText(extraction),
            FormatTag::Unknown => ExtractionResult::Unsupported(extraction),
        }
    }

    /// Result for a format with no registered handler.
    pub fn unsupported(format: FormatTag) -> Self {
        ExtractionResult::Unsupported(Extraction {
            fields: BTreeMap::new(),
            validation_errors: vec![format!("unsupported format: {format}")],
        })
    }

    /// Borrow the inner extraction.
    pub fn extraction(&self) -> &Extraction {
        match self {
            ExtractionResult::StructuredData(extraction)
            | ExtractionResult::Email(extraction)
            | ExtractionResult::PdfText(extraction)
            | ExtractionResult::Unsupported(extraction) => extraction,
        }
    }

    /// Extracted fields.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.extraction().fields
    }

    /// Validation findings in the order they were produced.
    pub fn validation_errors(&self) -> &[String] {
        &self.extraction().validation_errors
    }

    /// True when no validation findings were recorded.
    pub fn is_valid(&self) -> bool {
        self.validation_errors().is_empty()
    }

    /// Wire name of the handler variant.
    pub fn handler_name(&self) -> &'static str {
        match self {
            ExtractionResult::StructuredData(_) => "structured_data",
            ExtractionResult::Email(_) => "email",
            ExtractionResult::PdfText(_) => "pdf_text",
            ExtractionResult::Unsupported(_) => "unsupported",
        }
    }
}
