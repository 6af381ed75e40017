//! End-to-end routing tests against the default configuration.

use docroute_config::{DocrouteConfig, MemoryConfig};
use docroute_core::{CoreError, DocumentRouter};
use docroute_memory::{ContextStore, InMemoryContextStore, RetentionPolicy};
use docroute_protocol::{ExtractionResult, FormatTag, IntentLabel, ProcessingRequest};
use docroute_test_utils::fixtures::{
    COMPLAINT_EMAIL, INVOICE_JSON, INVOICE_PDF_TEXT, RFQ_EMAIL, UNDATED_EMAIL, UNSTRUCTURED_TEXT,
};
use docroute_test_utils::{FailingStore, RecordingStore};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn router() -> (DocumentRouter, InMemoryContextStore) {
    let store = InMemoryContextStore::new();
    let router = DocumentRouter::from_config(&DocrouteConfig::default(), Arc::new(store.clone()))
        .expect("router");
    (router, store)
}

/// Invoice JSON is structured data with an invoice intent.
#[test]
fn routes_invoice_json() {
    let (router, store) = router();
    let result = router.submit(INVOICE_JSON).expect("route");

    assert_eq!(result.classification.format, FormatTag::StructuredData);
    assert_eq!(result.classification.intent, IntentLabel::Invoice);
    assert_eq!(result.classification.confidence, 0.5);
    assert!(matches!(
        result.processing_result,
        ExtractionResult::StructuredData(_)
    ));
    assert_eq!(
        result.processing_result.fields()["invoice_number"],
        json!("INV-001")
    );
    assert!(result.processing_result.is_valid());

    let record = store.get_by_id(result.record_id).expect("record");
    assert_eq!(record.source, result.classification.format);
    assert_eq!(record.intent, result.classification.intent);
    assert_eq!(&record.extracted_values, result.processing_result.fields());
}

/// An RFQ email is routed to the email handler.
#[test]
fn routes_rfq_email() {
    let (router, _store) = router();
    let result = router.submit(RFQ_EMAIL).expect("route");

    assert_eq!(result.classification.format, FormatTag::Email);
    assert_eq!(result.classification.intent, IntentLabel::Rfq);
    let fields = result.processing_result.fields();
    assert_eq!(fields["sender"], json!("sender@example.com"));
    assert!(
        fields["subject"]
            .as_str()
            .is_some_and(|subject| subject.contains("RFQ"))
    );
}

/// Text without markers is unknown, unclassified and flagged.
#[test]
fn routes_unstructured_text() {
    let (router, store) = router();
    let result = router.submit(UNSTRUCTURED_TEXT).expect("route");

    assert_eq!(result.classification.format, FormatTag::Unknown);
    assert_eq!(result.classification.intent, IntentLabel::Other);
    assert_eq!(result.classification.confidence, 0.0);
    assert_eq!(
        result.processing_result.validation_errors(),
        ["unsupported format: unknown"]
    );
    assert!(result.processing_result.fields().is_empty());
    assert_eq!(store.len(), 1);
}

#[test]
fn complaint_email_carries_urgency_and_entities() {
    let (router, _store) = router();
    let result = router.submit(COMPLAINT_EMAIL).expect("route");

    assert_eq!(result.classification.intent, IntentLabel::Complaint);
    let fields = result.processing_result.fields();
    assert_eq!(fields["sender_name"], json!("Jane Doe"));
    assert_eq!(fields["urgency"], json!("high"));
    assert_eq!(fields["entities"]["references"], json!(["ORD-7781"]));
    assert_eq!(fields["entities"]["amounts"], json!(["$1,250.00"]));
}

#[test]
fn undated_email_still_routes() {
    let (router, _store) = router();
    let result = router.submit(UNDATED_EMAIL).expect("route");
    assert_eq!(result.classification.intent, IntentLabel::Rfq);
    assert_eq!(
        result.processing_result.validation_errors(),
        ["missing `Date` header"]
    );
}

#[test]
fn pdf_hint_routes_converted_text() {
    let (router, _store) = router();
    let request =
        ProcessingRequest::new(INVOICE_PDF_TEXT).with_format_hint(FormatTag::PdfText);
    let result = router.route(request).expect("route");

    assert_eq!(result.classification.format, FormatTag::PdfText);
    assert_eq!(result.classification.intent, IntentLabel::Invoice);
    assert_eq!(result.processing_result.handler_name(), "pdf_text");
    assert_eq!(
        result.processing_result.fields()["invoice_number"],
        json!("INV-2024-17")
    );
    assert!(result.processing_result.is_valid());
}

/// Content matching both structured and email signatures is structured.
#[test]
fn structured_detection_beats_email() {
    let (router, _store) = router();
    let content = r#"{"header": "From: a@example.com", "Subject": "complaint"}"#;
    let result = router.submit(content).expect("route");
    assert_eq!(result.classification.format, FormatTag::StructuredData);
}

#[test]
fn empty_content_is_rejected() {
    let (router, store) = router();
    let err = router.submit("  \n\t").unwrap_err();
    assert!(matches!(err, CoreError::EmptyContent));
    assert!(store.is_empty());
}

#[test]
fn store_failures_surface_as_memory_errors() {
    let router =
        DocumentRouter::from_config(&DocrouteConfig::default(), Arc::new(FailingStore::new()))
            .expect("router");
    let err = router.submit(INVOICE_JSON).unwrap_err();
    assert!(matches!(err, CoreError::Memory(_)));
}

#[test]
fn confidence_is_bounded_and_zero_only_for_other() {
    let (router, _store) = router();
    let samples = [
        INVOICE_JSON,
        RFQ_EMAIL,
        COMPLAINT_EMAIL,
        UNDATED_EMAIL,
        UNSTRUCTURED_TEXT,
        INVOICE_PDF_TEXT,
        "regulation compliance policy requirement",
        "{}",
        "From:",
    ];
    for content in samples {
        let classification = router.submit(content).expect("route").classification;
        assert!((0.0..=1.0).contains(&classification.confidence));
        assert_eq!(
            classification.confidence == 0.0,
            classification.intent == IntentLabel::Other,
            "{content}"
        );
    }
}

#[test]
fn classification_is_idempotent() {
    let (router, _store) = router();
    let first = router.submit(COMPLAINT_EMAIL).expect("route");
    let second = router.submit(COMPLAINT_EMAIL).expect("route");
    assert_eq!(first.classification, second.classification);
    assert_ne!(first.record_id, second.record_id);
}

/// Sequential calls on one thread are listed in completion order.
#[test]
fn thread_history_follows_call_order() {
    let (router, _store) = router();
    let first = router
        .route(ProcessingRequest::new(RFQ_EMAIL).with_thread("t-1"))
        .expect("route");
    router
        .route(ProcessingRequest::new(UNSTRUCTURED_TEXT).with_thread("t-2"))
        .expect("route");
    let second = router
        .route(ProcessingRequest::new(INVOICE_JSON).with_thread("t-1"))
        .expect("route");

    let history: Vec<_> = router
        .thread_history("t-1")
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(history, vec![first.record_id, second.record_id]);
    assert_eq!(second.thread_id.as_deref(), Some("t-1"));
    assert!(router.thread_history("missing").is_empty());
}

#[test]
fn concurrent_routes_keep_records_whole() {
    let (router, store) = router();
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let router = router.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    let request =
                        ProcessingRequest::new(INVOICE_JSON).with_thread(format!("w-{worker}"));
                    router.route(request).expect("route");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("join");
    }

    assert_eq!(store.len(), 100);
    for worker in 0..4 {
        let records = router.thread_history(&format!("w-{worker}"));
        assert_eq!(records.len(), 25);
        assert!(records.iter().all(|record| {
            record.intent == IntentLabel::Invoice
                && record.extracted_values["invoice_number"] == json!("INV-001")
        }));
    }
}

#[test]
fn raw_excerpt_is_bounded_by_config() {
    let store = RecordingStore::new();
    let config = DocrouteConfig::builder()
        .memory(MemoryConfig {
            max_records: None,
            excerpt_chars: 8,
        })
        .build();
    let router = DocumentRouter::from_config(&config, Arc::new(store.clone())).expect("router");
    router.submit(UNSTRUCTURED_TEXT).expect("route");

    let records = store.appended();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].raw_excerpt, "random u");
}

#[test]
fn capped_store_evicts_oldest_records() {
    let store = InMemoryContextStore::with_policy(RetentionPolicy::capped(2));
    let router =
        DocumentRouter::from_config(&DocrouteConfig::default(), Arc::new(store.clone()))
            .expect("router");
    let first = router.submit(INVOICE_JSON).expect("route");
    router.submit(RFQ_EMAIL).expect("route");
    router.submit(UNSTRUCTURED_TEXT).expect("route");

    assert_eq!(store.len(), 2);
    assert!(router.get_record(first.record_id).is_err());
}

/// A header-shaped preamble before the real headers does not hide them.
#[test]
fn forwarded_note_before_headers_keeps_email_fields() {
    let (router, _store) = router();
    let content = "Note: forwarded below\n\nFrom: a@example.com\nSubject: Complaint\nDate: 2024-03-20\n\nI have a complaint";
    let result = router.submit(content).expect("route");

    assert_eq!(result.classification.format, FormatTag::Email);
    assert_eq!(result.classification.intent, IntentLabel::Complaint);
    let fields = result.processing_result.fields();
    assert_eq!(fields["sender"], json!("a@example.com"));
    assert_eq!(fields["subject"], json!("Complaint"));
    assert!(result.processing_result.validation_errors().is_empty());
}

/// Configs built in code are validated before a router is wired.
#[test]
fn from_config_rejects_invalid_builder_config() {
    let mut config = DocrouteConfig::builder().build();
    config.classifier.min_score = -0.5;
    let err = DocumentRouter::from_config(&config, Arc::new(InMemoryContextStore::new()))
        .err()
        .expect("invalid config");
    assert!(matches!(err, CoreError::Config(_)));
}
