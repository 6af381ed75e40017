//! Explainable keyword scoring for intent classification.

use crate::CoreError;
use crate::parse;
use crate::terms::TermMatcher;
use docroute_config::ClassifierConfig;
use docroute_protocol::{Classification, FormatTag, IntentLabel};
use log::debug;

/// Scores content against per-intent trigger lists.
///
/// An intent's score is the fraction of its triggers that match. The highest
/// score strictly above `min_score` wins; ties keep the earlier intent in
/// [`IntentLabel::PRIORITY`]. With no winner the result is `other` at 0.0.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    matchers: Vec<(IntentLabel, Vec<TermMatcher>)>,
    min_score: f64,
}

impl IntentClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, CoreError> {
        let mut matchers = Vec::with_capacity(IntentLabel::PRIORITY.len());
        for intent in IntentLabel::PRIORITY {
            let triggers = TermMatcher::compile_all(config.triggers.for_intent(intent))?;
            matchers.push((intent, triggers));
        }
        Ok(Self {
            matchers,
            min_score: config.min_score,
        })
    }

    /// Classify `content` already tagged with `format`.
    pub fn classify(&self, format: FormatTag, content: &str) -> Classification {
        let scores = self.scores(format, content);
        let mut best: Option<(IntentLabel, f64)> = None;
        for (intent, score) in scores {
            if score <= self.min_score {
                continue;
            }
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((intent, score));
            }
        }
        match best {
            Some((intent, confidence)) => Classification {
                format,
                intent,
                confidence,
            },
            None => Classification::unclassified(format),
        }
    }

    /// Per-intent scores in priority order.
    pub fn scores(&self, format: FormatTag, content: &str) -> Vec<(IntentLabel, f64)> {
        let text = parse::classification_text(format, content);
        self.matchers
            .iter()
            .map(|(intent, triggers)| {
                let matched: Vec<&str> = triggers
                    .iter()
                    .filter(|trigger| trigger.is_match(&text))
                    .map(TermMatcher::term)
                    .collect();
                let score = if triggers.is_empty() {
                    0.0
                } else {
                    (matched.len() as f64 / triggers.len() as f64).clamp(0.0, 1.0)
                };
                if !matched.is_empty() {
                    debug!("intent scored (intent={intent}, score={score:.3}, matched={matched:?})");
                }
                (*intent, score)
            })
            .collect()
    }
}
