//! Content parsing shared by the detector, classifier and handlers.

use docroute_protocol::FormatTag;
use log::debug;
use mailparse::{MailHeaderMap, ParsedMail};
use serde_json::{Map, Value};

/// Parse content as a JSON object; arrays and scalars are not documents.
pub(crate) fn parse_structured(content: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Header values and plain-text body of an email message.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EmailParts {
    pub from: Option<String>,
    pub subject: Option<String>,
    pub date: Option<String>,
    pub body: String,
}

impl EmailParts {
    /// Parse an email, skipping any preamble before the first header line.
    ///
    /// Falls back to a line-based header scan when the MIME parser rejects
    /// the message.
    pub(crate) fn parse(content: &str) -> Self {
        let message = skip_preamble(content);
        match mailparse::parse_mail(message.as_bytes()) {
            Ok(mail) => Self::from_mail(&mail),
            Err(err) => {
                debug!("mime parse failed, using loose header scan (error={err})");
                Self::parse_loose(message)
            }
        }
    }

    fn from_mail(mail: &ParsedMail<'_>) -> Self {
        let header = |name: &str| {
            mail.headers
                .get_first_value(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        Self {
            from: header("From"),
            subject: header("Subject"),
            date: header("Date"),
            body: plain_text_body(mail)
                .map(|body| body.trim().to_string())
                .unwrap_or_default(),
        }
    }

    fn parse_loose(message: &str) -> Self {
        let (head, body) = split_header_block(message);
        let mut parts = Self {
            body: body.trim().to_string(),
            ..Self::default()
        };
        for line in head.lines() {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let slot = match name.trim().to_ascii_lowercase().as_str() {
                "from" => &mut parts.from,
                "subject" => &mut parts.subject,
                "date" => &mut parts.date,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }
        parts
    }
}

/// First text/plain leaf of a message, or the whole body for single-part mail.
fn plain_text_body(mail: &ParsedMail<'_>) -> Option<String> {
    if mail.subparts.is_empty() {
        return mail.get_body().ok();
    }
    mail.subparts.iter().find_map(|part| {
        if !part.subparts.is_empty() {
            plain_text_body(part)
        } else if part.ctype.mimetype.eq_ignore_ascii_case("text/plain") {
            part.get_body().ok()
        } else {
            None
        }
    })
}

/// True for lines shaped like `Name: value`.
fn is_header_line(line: &str) -> bool {
    let Some((name, _)) = line.split_once(':') else {
        return false;
    };
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}

/// True for a `From:` or `Subject:` line, ignoring case and surrounding
/// whitespace. Both the detector and the header scan anchor on these.
pub(crate) fn is_email_anchor(line: &str) -> bool {
    let line = line.trim();
    has_prefix_ignore_case(line, "from:") || has_prefix_ignore_case(line, "subject:")
}

fn has_prefix_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Start of the header block: the run of contiguous header lines holding the
/// first `From:`/`Subject:` line. Earlier lines are preamble.
fn skip_preamble(content: &str) -> &str {
    let mut offset = 0;
    let mut run_start = None;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if is_header_line(trimmed) {
            let start = *run_start.get_or_insert(offset + (line.len() - trimmed.len()));
            if is_email_anchor(trimmed) {
                return &content[start..];
            }
        } else {
            run_start = None;
        }
        offset += line.len();
    }
    content.trim_start()
}

fn split_header_block(message: &str) -> (&str, &str) {
    let crlf = message.find("\r\n\r\n").map(|idx| (idx, 4));
    let lf = message.find("\n\n").map(|idx| (idx, 2));
    let split = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };
    match split {
        Some((idx, len)) => (&message[..idx], &message[idx + len..]),
        None => (message, ""),
    }
}

/// Joins independent pieces of classification text. `\s` does not match it,
/// so a multi-word trigger never spans two keys, values or email parts.
pub(crate) const TERM_SEPARATOR: char = '\u{1f}';

/// Text the intent classifier scores for a given format.
///
/// Structured documents contribute their keys and string values; emails
/// contribute subject and body; everything else is scored as-is.
pub(crate) fn classification_text(format: FormatTag, content: &str) -> String {
    match format {
        FormatTag::StructuredData => match parse_structured(content) {
            Some(map) => {
                let mut terms = Vec::new();
                for (key, value) in &map {
                    terms.push(key.clone());
                    collect_terms(value, &mut terms);
                }
                terms.join(&TERM_SEPARATOR.to_string())
            }
            None => content.to_string(),
        },
        FormatTag::Email => {
            let parts = EmailParts::parse(content);
            format!(
                "{}{TERM_SEPARATOR}{}",
                parts.subject.unwrap_or_default(),
                parts.body
            )
        }
        FormatTag::PdfText | FormatTag::Unknown => content.to_string(),
    }
}

fn collect_terms(value: &Value, terms: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                terms.push(key.clone());
                collect_terms(value, terms);
            }
        }
        Value::Array(values) => {
            for value in values {
                collect_terms(value, terms);
            }
        }
        Value::String(text) => terms.push(text.clone()),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}
