//! Configuration schema for docroute.

use docroute_protocol::IntentLabel;
use serde::{Deserialize, Serialize};

/// Root config for the docroute service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocrouteConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub handlers: HandlersConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl DocrouteConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> DocrouteConfigBuilder {
        DocrouteConfigBuilder::new()
    }
}

/// Builder for assembling a `DocrouteConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct DocrouteConfigBuilder {
    config: DocrouteConfig,
}

impl DocrouteConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: DocrouteConfig::default(),
        }
    }

    /// Replace the format detector configuration.
    pub fn detector(mut self, detector: DetectorConfig) -> Self {
        self.config.detector = detector;
        self
    }

    /// Replace the intent classifier configuration.
    pub fn classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.config.classifier = classifier;
        self
    }

    /// Replace the handler configuration.
    pub fn handlers(mut self, handlers: HandlersConfig) -> Self {
        self.config.handlers = handlers;
        self
    }

    /// Replace the context store configuration.
    pub fn memory(mut self, memory: MemoryConfig) -> Self {
        self.config.memory = memory;
        self
    }

    /// Replace the HTTP server configuration.
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Finalize and return the built `DocrouteConfig`.
    pub fn build(self) -> DocrouteConfig {
        self.config
    }
}

/// Format detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Number of leading non-empty lines searched for `From:`/`Subject:`.
    #[serde(default = "default_email_header_window")]
    pub email_header_window: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            email_header_window: default_email_header_window(),
        }
    }
}

fn default_email_header_window() -> usize {
    10
}

/// Intent classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub triggers: IntentTriggers,
    /// Scores must be strictly above this to count.
    #[serde(default)]
    pub min_score: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            triggers: IntentTriggers::default(),
            min_score: 0.0,
        }
    }
}

/// Trigger vocabulary per intent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentTriggers {
    #[serde(default = "default_invoice_triggers")]
    pub invoice: Vec<String>,
    #[serde(default = "default_rfq_triggers")]
    pub rfq: Vec<String>,
    #[serde(default = "default_complaint_triggers")]
    pub complaint: Vec<String>,
    #[serde(default = "default_regulation_triggers")]
    pub regulation: Vec<String>,
}

impl IntentTriggers {
    /// Trigger list for a scored intent; `other` has none.
    pub fn for_intent(&self, intent: IntentLabel) -> &[String] {
        match intent {
            IntentLabel::Invoice => &self.invoice,
            IntentLabel::Rfq => &self.rfq,
            IntentLabel::Complaint => &self.complaint,
            IntentLabel::Regulation => &self.regulation,
            IntentLabel::Other => &[],
        }
    }
}

impl Default for IntentTriggers {
    fn default() -> Self {
        Self {
            invoice: default_invoice_triggers(),
            rfq: default_rfq_triggers(),
            complaint: default_complaint_triggers(),
            regulation: default_regulation_triggers(),
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|word| word.to_string()).collect()
}

fn default_invoice_triggers() -> Vec<String> {
    words(&[
        "invoice",
        "invoice_number",
        "amount",
        "bill",
        "payment",
        "amount due",
    ])
}

fn default_rfq_triggers() -> Vec<String> {
    words(&["rfq", "quote", "request for quote", "purchasing", "pricing"])
}

fn default_complaint_triggers() -> Vec<String> {
    words(&["complaint", "dissatisfied", "issue", "problem", "concern"])
}

fn default_regulation_triggers() -> Vec<String> {
    words(&["regulation", "compliance", "policy", "requirement"])
}

/// Handler extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlersConfig {
    /// Maximum characters kept in an email `body_excerpt`.
    #[serde(default = "default_excerpt_chars")]
    pub body_excerpt_chars: usize,
    /// Maximum characters kept in a pdf-text `text_excerpt`.
    #[serde(default = "default_excerpt_chars")]
    pub text_excerpt_chars: usize,
    #[serde(default)]
    pub urgency: UrgencyKeywords,
}

impl Default for HandlersConfig {
    fn default() -> Self {
        Self {
            body_excerpt_chars: default_excerpt_chars(),
            text_excerpt_chars: default_excerpt_chars(),
            urgency: UrgencyKeywords::default(),
        }
    }
}

fn default_excerpt_chars() -> usize {
    500
}

/// Keyword sets used to grade email urgency; checked high to low.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrgencyKeywords {
    #[serde(default = "default_high_urgency")]
    pub high: Vec<String>,
    #[serde(default = "default_medium_urgency")]
    pub medium: Vec<String>,
}

impl Default for UrgencyKeywords {
    fn default() -> Self {
        Self {
            high: default_high_urgency(),
            medium: default_medium_urgency(),
        }
    }
}

fn default_high_urgency() -> Vec<String> {
    words(&["urgent", "asap", "immediately", "critical", "emergency"])
}

fn default_medium_urgency() -> Vec<String> {
    words(&["soon", "shortly", "prompt", "timely"])
}

/// Context store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Optional cap on retained records; unbounded when absent.
    #[serde(default)]
    pub max_records: Option<usize>,
    /// Maximum characters of raw content copied into each record.
    #[serde(default = "default_record_excerpt_chars")]
    pub excerpt_chars: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_records: None,
            excerpt_chars: default_record_excerpt_chars(),
        }
    }
}

fn default_record_excerpt_chars() -> usize {
    200
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Request body limit for uploads, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Allow any origin, method and header.
    #[serde(default = "default_permissive_cors")]
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
            permissive_cors: default_permissive_cors(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_permissive_cors() -> bool {
    true
}
