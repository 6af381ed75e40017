//! Handler for email messages.

use super::FormatHandler;
use super::entities::EntityExtractor;
use crate::CoreError;
use crate::parse::EmailParts;
use crate::terms::TermMatcher;
use chrono::{DateTime, NaiveDate};
use docroute_config::HandlersConfig;
use docroute_memory::excerpt;
use docroute_protocol::{Extraction, FormatTag, IntentLabel};

const FIELD_NAMES: &[&str] = &[
    "sender",
    "sender_name",
    "subject",
    "date",
    "body_excerpt",
    "urgency",
    "entities",
];

/// Extracts headers, a body excerpt, urgency and entities from an email.
///
/// Missing headers are reported as findings; a result is always produced.
#[derive(Debug, Clone)]
pub struct EmailHandler {
    body_excerpt_chars: usize,
    high_urgency: Vec<TermMatcher>,
    medium_urgency: Vec<TermMatcher>,
    entities: EntityExtractor,
}

impl EmailHandler {
    pub fn new(config: &HandlersConfig) -> Result<Self, CoreError> {
        Ok(Self {
            body_excerpt_chars: config.body_excerpt_chars,
            high_urgency: TermMatcher::compile_all(&config.urgency.high)?,
            medium_urgency: TermMatcher::compile_all(&config.urgency.medium)?,
            entities: EntityExtractor::new()?,
        })
    }

    fn urgency(&self, text: &str) -> &'static str {
        if self.high_urgency.iter().any(|term| term.is_match(text)) {
            "high"
        } else if self.medium_urgency.iter().any(|term| term.is_match(text)) {
            "medium"
        } else {
            "low"
        }
    }
}

impl FormatHandler for EmailHandler {
    fn format(&self) -> FormatTag {
        FormatTag::Email
    }

    fn field_names(&self) -> &'static [&'static str] {
        FIELD_NAMES
    }

    fn extract(&self, content: &str, _intent: IntentLabel) -> Extraction {
        let parts = EmailParts::parse(content);
        let mut extraction = Extraction::default();
        if let Some(from) = parts.from.as_deref() {
            let (address, name) = split_sender(from);
            extraction.insert("sender", address);
            extraction.insert_opt("sender_name", name);
        }
        extraction.insert_opt("subject", parts.subject.clone());
        extraction.insert_opt("date", parts.date.clone());
        extraction.insert("body_excerpt", excerpt(&parts.body, self.body_excerpt_chars));

        let scored = format!("{}\n{}", parts.subject.as_deref().unwrap_or_default(), parts.body);
        extraction.insert("urgency", self.urgency(&scored));
        extraction.insert("entities", self.entities.extract(&scored).into_value());
        extraction
    }

    fn validate(&self, extraction: &Extraction, _intent: IntentLabel) -> Vec<String> {
        let fields = &extraction.fields;
        let mut findings = Vec::new();
        for (field, header) in [("sender", "From"), ("subject", "Subject"), ("date", "Date")] {
            if !fields.contains_key(field) {
                findings.push(format!("missing `{header}` header"));
            }
        }
        if let Some(date) = fields.get("date").and_then(|value| value.as_str()) {
            if !is_recognized_date(date) {
                findings.push(format!("unrecognized `Date` header: {date}"));
            }
        }
        findings
    }
}

/// Split a `From` value into address and optional display name.
fn split_sender(from: &str) -> (String, Option<String>) {
    match mailparse::addrparse(from)
        .ok()
        .and_then(|list| list.extract_single_info())
    {
        Some(info) => (
            info.addr,
            info.display_name.filter(|name| !name.trim().is_empty()),
        ),
        None => (from.trim().to_string(), None),
    }
}

/// Accepts RFC 2822, RFC 3339 and bare `YYYY-MM-DD` dates.
fn is_recognized_date(value: &str) -> bool {
    DateTime::parse_from_rfc2822(value).is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
