//! Regex entity extraction for free text.

use crate::CoreError;
use regex::Regex;
use serde_json::{Value, json};

const DATE_PATTERN: &str = r"\b(?:\d{4}[-/]\d{1,2}[-/]\d{1,2}|\d{1,2}[-/]\d{1,2}[-/]\d{2,4})\b";
const AMOUNT_PATTERN: &str = r"[$€£]\s?\d+(?:,\d{3})*(?:\.\d{2})?";
const REFERENCE_PATTERN: &str = r"\b(?i:ref|reference|id|number|no\.?)[:#\s]+([A-Z0-9-]*\d[A-Z0-9-]*)";
const EMAIL_PATTERN: &str = r"[\w.+-]+@[\w-]+(?:\.[\w-]+)+";
const PHONE_PATTERN: &str = r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b";

/// Dates, currency amounts, references and contacts found in text.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Entities {
    pub dates: Vec<String>,
    pub amounts: Vec<String>,
    pub references: Vec<String>,
    pub contacts: Vec<String>,
}

impl Entities {
    pub(crate) fn into_value(self) -> Value {
        json!({
            "dates": self.dates,
            "amounts": self.amounts,
            "references": self.references,
            "contacts": self.contacts,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EntityExtractor {
    dates: Regex,
    amounts: Regex,
    references: Regex,
    emails: Regex,
    phones: Regex,
}

impl EntityExtractor {
    pub(crate) fn new() -> Result<Self, CoreError> {
        Ok(Self {
            dates: compile(DATE_PATTERN)?,
            amounts: compile(AMOUNT_PATTERN)?,
            references: compile(REFERENCE_PATTERN)?,
            emails: compile(EMAIL_PATTERN)?,
            phones: compile(PHONE_PATTERN)?,
        })
    }

    /// Collect entities in order of first appearance, without duplicates.
    pub(crate) fn extract(&self, text: &str) -> Entities {
        let mut contacts = matches(&self.emails, text);
        for phone in matches(&self.phones, text) {
            push_unique(&mut contacts, phone);
        }
        let mut references = Vec::new();
        for caps in self.references.captures_iter(text) {
            if let Some(reference) = caps.get(1) {
                push_unique(&mut references, reference.as_str().to_string());
            }
        }
        Entities {
            dates: matches(&self.dates, text),
            amounts: matches(&self.amounts, text),
            references,
            contacts,
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, CoreError> {
    Regex::new(pattern).map_err(|err| CoreError::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}

fn matches(regex: &Regex, text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for hit in regex.find_iter(text) {
        push_unique(&mut found, hit.as_str().to_string());
    }
    found
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}
