//! Router tying detection, classification, handling and recording together.

use crate::{CoreError, FormatDetector, HandlerRegistry, IntentClassifier};
use chrono::Utc;
use docroute_config::DocrouteConfig;
use docroute_memory::{ContextStore, MemoryRecord, excerpt};
use docroute_protocol::{ProcessingRequest, RecordId, RouterResult};
use log::{debug, info};
use std::sync::Arc;
use uuid::Uuid;

/// Routes each request through detect, classify, handle and record.
///
/// The context store is injected so callers own its lifecycle; the router
/// holds no other shared state.
#[derive(Clone)]
pub struct DocumentRouter {
    detector: FormatDetector,
    classifier: IntentClassifier,
    registry: HandlerRegistry,
    store: Arc<dyn ContextStore>,
    excerpt_chars: usize,
}

impl DocumentRouter {
    /// Assemble a router from explicit components.
    pub fn new(
        detector: FormatDetector,
        classifier: IntentClassifier,
        registry: HandlerRegistry,
        store: Arc<dyn ContextStore>,
        excerpt_chars: usize,
    ) -> Self {
        Self {
            detector,
            classifier,
            registry,
            store,
            excerpt_chars,
        }
    }

    /// Build a router with the default handlers configured from `config`.
    ///
    /// `config` is validated first, so builder-made configs get the same
    /// checks as loaded ones.
    pub fn from_config(
        config: &DocrouteConfig,
        store: Arc<dyn ContextStore>,
    ) -> Result<Self, CoreError> {
        info!("initializing router");
        config.validate()?;
        let detector = FormatDetector::new(&config.detector);
        let classifier = IntentClassifier::new(&config.classifier)?;
        let registry = HandlerRegistry::with_defaults(&config.handlers)?;
        debug!("handler registry wired (formats={:?})", registry.formats());
        Ok(Self::new(
            detector,
            classifier,
            registry,
            store,
            config.memory.excerpt_chars,
        ))
    }

    /// Route one request and append its record to the context store.
    ///
    /// Unparseable or unsupported content still produces a result; only an
    /// empty request is rejected.
    pub fn route(&self, request: ProcessingRequest) -> Result<RouterResult, CoreError> {
        if request.content.trim().is_empty() {
            return Err(CoreError::EmptyContent);
        }
        let content = request.content.as_str();
        let format = self.detector.detect(content, request.format_hint);
        let classification = self.classifier.classify(format, content);
        let processing_result = self.registry.process(format, content, classification.intent);

        let record = MemoryRecord {
            id: Uuid::new_v4(),
            thread_id: request.thread_id.clone(),
            source: classification.format,
            intent: classification.intent,
            timestamp: Utc::now(),
            extracted_values: processing_result.fields().clone(),
            raw_excerpt: excerpt(content, self.excerpt_chars),
        };
        let record_id = self.store.append(record)?;
        info!(
            "routed request (record_id={}, format={}, intent={}, confidence={:.3}, findings={}, source={})",
            record_id,
            classification.format,
            classification.intent,
            classification.confidence,
            processing_result.validation_errors().len(),
            request.source.as_deref().unwrap_or("unspecified")
        );
        Ok(RouterResult {
            record_id,
            thread_id: request.thread_id,
            classification,
            processing_result,
        })
    }

    /// Route raw text with no hint or thread.
    pub fn submit(&self, content: &str) -> Result<RouterResult, CoreError> {
        self.route(ProcessingRequest::new(content))
    }

    /// Fetch a stored record.
    pub fn get_record(&self, id: RecordId) -> Result<MemoryRecord, CoreError> {
        Ok(self.store.get_by_id(id)?)
    }

    /// Records filed under a thread, oldest first.
    pub fn thread_history(&self, thread_id: &str) -> Vec<MemoryRecord> {
        self.store.get_by_thread(thread_id)
    }

    /// The injected context store.
    pub fn store(&self) -> &Arc<dyn ContextStore> {
        &self.store
    }

    /// The handler registry, for registering additional formats.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }
}
