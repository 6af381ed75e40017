//! Content-based format detection.

use crate::parse;
use docroute_config::DetectorConfig;
use docroute_protocol::FormatTag;
use log::debug;

/// Declares a [`FormatTag`] for raw text.
///
/// Checks run in priority order: JSON object, email headers, the pdf-text
/// hint from the upload path, then unknown. Malformed input is never an
/// error; it fails each check and falls through.
#[derive(Debug, Clone)]
pub struct FormatDetector {
    email_header_window: usize,
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new(&DetectorConfig::default())
    }
}

impl FormatDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            email_header_window: config.email_header_window,
        }
    }

    /// Detect the format of `content`. Only a pdf-text hint is honored, and
    /// only after content-based checks fail.
    pub fn detect(&self, content: &str, hint: Option<FormatTag>) -> FormatTag {
        let format = if parse::parse_structured(content).is_some() {
            FormatTag::StructuredData
        } else if self.has_email_headers(content) {
            FormatTag::Email
        } else if hint == Some(FormatTag::PdfText) {
            FormatTag::PdfText
        } else {
            FormatTag::Unknown
        };
        debug!(
            "format detected (format={format}, hint={}, len={})",
            hint.map_or("none", |hint| hint.as_str()),
            content.len()
        );
        format
    }

    fn has_email_headers(&self, content: &str) -> bool {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(self.email_header_window)
            .any(parse::is_email_anchor)
    }
}
