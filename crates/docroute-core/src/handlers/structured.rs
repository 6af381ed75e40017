//! Handler for JSON documents.

use super::{FormatHandler, missing_field};
use crate::parse;
use chrono::{DateTime, NaiveDate};
use docroute_protocol::{Extraction, FormatTag, IntentLabel};
use serde_json::{Map, Value};

/// Keys copied from the document envelope regardless of intent.
const ENVELOPE_FIELDS: &[&str] = &["type", "source", "timestamp"];
const DATE_FIELDS: &[&str] = &["date", "deadline", "effective_date"];
const LIST_FIELDS: &[&str] = &["items", "requested_items", "requirements"];

const FIELD_NAMES: &[&str] = &[
    "type",
    "source",
    "timestamp",
    "invoice_number",
    "amount",
    "date",
    "items",
    "customer",
    "rfq_number",
    "requested_items",
    "deadline",
    "contact",
    "complaint_id",
    "description",
    "severity",
    "regulation_id",
    "title",
    "requirements",
    "effective_date",
];

fn required_fields(intent: IntentLabel) -> &'static [&'static str] {
    match intent {
        IntentLabel::Invoice => &["invoice_number", "amount", "date"],
        IntentLabel::Rfq => &["rfq_number", "requested_items", "deadline"],
        IntentLabel::Complaint => &["complaint_id", "description", "severity"],
        IntentLabel::Regulation => &["regulation_id", "title", "requirements", "effective_date"],
        IntentLabel::Other => &[],
    }
}

fn optional_fields(intent: IntentLabel) -> &'static [&'static str] {
    match intent {
        IntentLabel::Invoice => &["items", "customer"],
        IntentLabel::Rfq | IntentLabel::Complaint => &["contact"],
        IntentLabel::Regulation | IntentLabel::Other => &[],
    }
}

/// Extracts per-intent keys from a JSON object, looking under `data` first.
#[derive(Debug, Clone, Default)]
pub struct StructuredDataHandler;

impl StructuredDataHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for StructuredDataHandler {
    fn format(&self) -> FormatTag {
        FormatTag::StructuredData
    }

    fn field_names(&self) -> &'static [&'static str] {
        FIELD_NAMES
    }

    fn extract(&self, content: &str, intent: IntentLabel) -> Extraction {
        let mut extraction = Extraction::default();
        let Some(document) = parse::parse_structured(content) else {
            extraction.error("content is not a JSON object");
            return extraction;
        };
        for key in ENVELOPE_FIELDS {
            if let Some(value) = document.get(*key).filter(|value| !value.is_null()) {
                extraction.insert(key, value.clone());
            }
        }
        let payload = document.get("data").and_then(Value::as_object);
        for key in required_fields(intent).iter().chain(optional_fields(intent)) {
            if let Some(value) = lookup(payload, &document, key) {
                extraction.insert(key, value.clone());
            }
        }
        extraction
    }

    fn validate(&self, extraction: &Extraction, intent: IntentLabel) -> Vec<String> {
        let fields = &extraction.fields;
        let mut findings: Vec<String> = required_fields(intent)
            .iter()
            .filter(|key| !fields.contains_key(**key))
            .map(|key| missing_field(key))
            .collect();

        if let Some(amount) = fields.get("amount") {
            match amount.as_f64() {
                Some(value) if value > 0.0 => {}
                Some(_) => findings.push("field `amount` must be positive".to_string()),
                None => findings.push("field `amount` must be a number".to_string()),
            }
        }
        for key in LIST_FIELDS {
            match fields.get(*key) {
                Some(Value::Array(items)) if items.is_empty() => {
                    findings.push(format!("field `{key}` must not be empty"));
                }
                Some(Value::Array(_)) | None => {}
                Some(_) => findings.push(format!("field `{key}` must be a list")),
            }
        }
        for key in DATE_FIELDS {
            if let Some(value) = fields.get(*key) {
                if !value.as_str().is_some_and(is_valid_date) {
                    findings.push(format!("field `{key}` is not a valid date"));
                }
            }
        }
        findings
    }
}

fn lookup<'a>(
    payload: Option<&'a Map<String, Value>>,
    document: &'a Map<String, Value>,
    key: &str,
) -> Option<&'a Value> {
    payload
        .and_then(|payload| payload.get(key))
        .or_else(|| document.get(key))
        .filter(|value| !value.is_null())
}

/// Accepts `YYYY-MM-DD` or RFC 3339 timestamps.
fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}
