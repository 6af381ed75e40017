use crate::ParseLabelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse content-type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatTag {
    /// JSON object document.
    StructuredData,
    /// RFC 5322 style message with header block.
    Email,
    /// Plain text produced from a PDF upload.
    PdfText,
    /// Nothing matched.
    Unknown,
}

impl FormatTag {
    /// All tags in detection priority order.
    pub const ALL: [FormatTag; 4] = [
        FormatTag::StructuredData,
        FormatTag::Email,
        FormatTag::PdfText,
        FormatTag::Unknown,
    ];

    /// Wire name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::StructuredData => "structured-data",
            FormatTag::Email => "email",
            FormatTag::PdfText => "pdf-text",
            FormatTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatTag {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "structured-data" | "structured_data" | "json" => Ok(FormatTag::StructuredData),
            "email" => Ok(FormatTag::Email),
            "pdf-text" | "pdf_text" | "pdf" => Ok(FormatTag::PdfText),
            "unknown" => Ok(FormatTag::Unknown),
            _ => Err(ParseLabelError {
                kind: "format",
                value: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FormatTag;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_as_kebab_case() {
        let json = serde_json::to_string(&FormatTag::StructuredData).expect("json");
        assert_eq!(json, "\"structured-data\"");
        let tag: FormatTag = serde_json::from_str("\"pdf-text\"").expect("tag");
        assert_eq!(tag, FormatTag::PdfText);
    }

    #[test]
    fn parses_common_aliases() {
        assert_eq!("json".parse::<FormatTag>().unwrap(), FormatTag::StructuredData);
        assert_eq!(" PDF ".parse::<FormatTag>().unwrap(), FormatTag::PdfText);
        let err = "xml".parse::<FormatTag>().unwrap_err();
        assert_eq!(err.to_string(), "unknown format: xml");
    }
}
