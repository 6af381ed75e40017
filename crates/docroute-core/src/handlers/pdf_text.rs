//! Handler for plain text produced by the upload PDF converter.

use super::entities::EntityExtractor;
use super::{FormatHandler, missing_field};
use crate::CoreError;
use docroute_config::HandlersConfig;
use docroute_memory::excerpt;
use docroute_protocol::{Extraction, FormatTag, IntentLabel};
use regex::Regex;

const INVOICE_NUMBER_PATTERN: &str =
    r"(?i)\binvoice\s*(?:number|num\.?|no\.?|#)\s*[:#]?\s*([A-Z0-9][A-Z0-9/-]*)";
const TOTAL_PATTERN: &str =
    r"(?i)\b(?:total(?:\s+due)?|amount\s+due|balance\s+due)\b\s*:?\s*[$€£]?\s?(\d+(?:,\d{3})*(?:\.\d+)?)";

const FIELD_NAMES: &[&str] = &[
    "invoice_number",
    "total",
    "text_excerpt",
    "word_count",
    "entities",
];

/// Extracts invoice markers, an excerpt and entities from converted text.
#[derive(Debug, Clone)]
pub struct PdfTextHandler {
    text_excerpt_chars: usize,
    invoice_number: Regex,
    total: Regex,
    entities: EntityExtractor,
}

impl PdfTextHandler {
    pub fn new(config: &HandlersConfig) -> Result<Self, CoreError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|err| CoreError::InvalidPattern {
                pattern: pattern.to_string(),
                message: err.to_string(),
            })
        };
        Ok(Self {
            text_excerpt_chars: config.text_excerpt_chars,
            invoice_number: compile(INVOICE_NUMBER_PATTERN)?,
            total: compile(TOTAL_PATTERN)?,
            entities: EntityExtractor::new()?,
        })
    }
}

impl FormatHandler for PdfTextHandler {
    fn format(&self) -> FormatTag {
        FormatTag::PdfText
    }

    fn field_names(&self) -> &'static [&'static str] {
        FIELD_NAMES
    }

    fn extract(&self, content: &str, _intent: IntentLabel) -> Extraction {
        let text = content.trim();
        let mut extraction = Extraction::default();
        extraction.insert_opt(
            "invoice_number",
            first_capture(&self.invoice_number, text).map(str::to_string),
        );
        extraction.insert_opt(
            "total",
            first_capture(&self.total, text).and_then(|digits| digits.replace(',', "").parse::<f64>().ok()),
        );
        extraction.insert("text_excerpt", excerpt(text, self.text_excerpt_chars));
        extraction.insert("word_count", text.split_whitespace().count());
        extraction.insert("entities", self.entities.extract(text).into_value());
        extraction
    }

    fn validate(&self, extraction: &Extraction, intent: IntentLabel) -> Vec<String> {
        let fields = &extraction.fields;
        let mut findings = Vec::new();
        if fields.get("word_count").and_then(|count| count.as_u64()) == Some(0) {
            findings.push("no text extracted from document".to_string());
        }
        if intent == IntentLabel::Invoice {
            for key in ["invoice_number", "total"] {
                if !fields.contains_key(key) {
                    findings.push(missing_field(key));
                }
            }
        }
        findings
    }
}

fn first_capture<'a>(regex: &Regex, text: &'a str) -> Option<&'a str> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|hit| hit.as_str())
}
