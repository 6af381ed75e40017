//! Case-insensitive whole-word term matching shared by the classifier and
//! the email urgency grader.

use crate::CoreError;
use regex::Regex;

/// Compiled matcher for one configured term.
#[derive(Debug, Clone)]
pub(crate) struct TermMatcher {
    term: String,
    regex: Regex,
}

impl TermMatcher {
    /// Compile `term` so it matches on word boundaries, ignoring case.
    ///
    /// Inner whitespace matches any whitespace run. A boundary is only
    /// required on a side where the term starts or ends with a word character.
    pub(crate) fn new(term: &str) -> Result<Self, CoreError> {
        let words: Vec<&str> = term.split_whitespace().collect();
        let (Some(first), Some(last)) = (words.first(), words.last()) else {
            return Err(CoreError::InvalidPattern {
                pattern: term.to_string(),
                message: "term must not be empty".to_string(),
            });
        };
        let leading = if first.chars().next().is_some_and(is_word_char) {
            r"\b"
        } else {
            ""
        };
        let trailing = if last.chars().last().is_some_and(is_word_char) {
            r"\b"
        } else {
            ""
        };
        let body = words
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join(r"\s+");
        let pattern = format!("(?i){leading}{body}{trailing}");
        let regex = Regex::new(&pattern).map_err(|err| CoreError::InvalidPattern {
            pattern: term.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            term: term.to_string(),
            regex,
        })
    }

    /// Compile a list of terms, failing on the first invalid one.
    pub(crate) fn compile_all(terms: &[String]) -> Result<Vec<Self>, CoreError> {
        terms.iter().map(|term| Self::new(term)).collect()
    }

    pub(crate) fn term(&self) -> &str {
        &self.term
    }

    pub(crate) fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
