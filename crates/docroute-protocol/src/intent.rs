use crate::{FormatTag, ParseLabelError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Business purpose assigned to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentLabel {
    Invoice,
    Rfq,
    Complaint,
    Regulation,
    Other,
}

impl IntentLabel {
    /// Scored intents in tie-break priority order (highest first).
    pub const PRIORITY: [IntentLabel; 4] = [
        IntentLabel::Invoice,
        IntentLabel::Rfq,
        IntentLabel::Complaint,
        IntentLabel::Regulation,
    ];

    /// Wire name of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::Invoice => "invoice",
            IntentLabel::Rfq => "rfq",
            IntentLabel::Complaint => "complaint",
            IntentLabel::Regulation => "regulation",
            IntentLabel::Other => "other",
        }
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentLabel {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "invoice" => Ok(IntentLabel::Invoice),
            "rfq" => Ok(IntentLabel::Rfq),
            "complaint" => Ok(IntentLabel::Complaint),
            "regulation" => Ok(IntentLabel::Regulation),
            "other" => Ok(IntentLabel::Other),
            _ => Err(ParseLabelError {
                kind: "intent",
                value: value.to_string(),
            }),
        }
    }
}

/// Format and intent decision for one piece of content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub format: FormatTag,
    pub intent: IntentLabel,
    /// Always within `[0.0, 1.0]`; zero exactly when the intent is `other`.
    pub confidence: f64,
}

impl Classification {
    /// Classification for content nothing matched.
    pub fn unclassified(format: FormatTag) -> Self {
        Self {
            format,
            intent: IntentLabel::Other,
            confidence: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Classification, IntentLabel};
    use crate::FormatTag;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn classification_wire_shape() {
        let classification = Classification {
            format: FormatTag::Email,
            intent: IntentLabel::Rfq,
            confidence: 0.25,
        };
        let value = serde_json::to_value(classification).expect("json");
        assert_eq!(
            value,
            json!({ "format": "email", "intent": "rfq", "confidence": 0.25 })
        );
    }

    #[test]
    fn priority_excludes_other() {
        assert!(!IntentLabel::PRIORITY.contains(&IntentLabel::Other));
        assert_eq!(IntentLabel::PRIORITY[0], IntentLabel::Invoice);
        assert_eq!("RFQ".parse::<IntentLabel>().unwrap(), IntentLabel::Rfq);
    }
}
