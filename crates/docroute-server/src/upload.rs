//! File intake: turns uploaded bytes into text before routing.

use docroute_core::{CoreError, DocumentRouter};
use docroute_protocol::{FormatTag, ProcessingRequest, RouterResult, ThreadId};
use log::{debug, info};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use thiserror::Error;

const PDF_MIME: &str = "application/pdf";
const UTF8_BOM: &str = "\u{feff}";

/// Errors raised while preparing an upload for routing.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("uploaded file is empty")]
    EmptyFile,
    #[error("pdf conversion failed: {0}")]
    PdfConversion(String),
    #[error("unsupported binary upload ({0})")]
    Binary(String),
    #[error("upload is not valid utf-8 text")]
    NotText,
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Converts PDF bytes to plain text.
pub trait PdfTextConverter: Send + Sync {
    fn convert(&self, bytes: &[u8]) -> Result<String, IntakeError>;
}

/// Converter backed by the `pdf-extract` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractConverter;

impl PdfTextConverter for PdfExtractConverter {
    fn convert(&self, bytes: &[u8]) -> Result<String, IntakeError> {
        // pdf-extract can panic on malformed documents.
        match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(err)) => Err(IntakeError::PdfConversion(err.to_string())),
            Err(_) => Err(IntakeError::PdfConversion(
                "malformed pdf document".to_string(),
            )),
        }
    }
}

/// Decodes uploads and hands them to the router.
#[derive(Clone)]
pub struct FileIntake {
    router: DocumentRouter,
    converter: Arc<dyn PdfTextConverter>,
}

impl FileIntake {
    pub fn new(router: DocumentRouter, converter: Arc<dyn PdfTextConverter>) -> Self {
        Self { router, converter }
    }

    /// Route an uploaded file.
    ///
    /// PDF payloads (declared or sniffed) are converted and routed with the
    /// pdf-text hint. Anything else must be UTF-8 text.
    pub fn submit_file(
        &self,
        bytes: &[u8],
        declared_mime: Option<&str>,
        thread_id: Option<ThreadId>,
    ) -> Result<RouterResult, IntakeError> {
        if bytes.is_empty() {
            return Err(IntakeError::EmptyFile);
        }
        let sniffed = infer::get(bytes).map(|kind| kind.mime_type());
        debug!(
            "upload received (bytes={}, declared={}, sniffed={})",
            bytes.len(),
            declared_mime.unwrap_or("none"),
            sniffed.unwrap_or("none")
        );

        let is_pdf = sniffed == Some(PDF_MIME) || declared_mime.is_some_and(is_pdf_mime);
        let mut request = if is_pdf {
            let text = self.converter.convert(bytes)?;
            info!("converted pdf upload (bytes={}, chars={})", bytes.len(), text.chars().count());
            ProcessingRequest::new(text).with_format_hint(FormatTag::PdfText)
        } else {
            if let Some(mime) = sniffed.filter(|mime| !is_textual_mime(mime)) {
                return Err(IntakeError::Binary(mime.to_string()));
            }
            let text = std::str::from_utf8(bytes).map_err(|_| IntakeError::NotText)?;
            ProcessingRequest::new(text.strip_prefix(UTF8_BOM).unwrap_or(text))
        };
        request = request.with_source("upload");
        if let Some(thread_id) = thread_id {
            request = request.with_thread(thread_id);
        }
        Ok(self.router.route(request)?)
    }
}

fn is_pdf_mime(mime: &str) -> bool {
    mime.split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(PDF_MIME))
}

fn is_textual_mime(mime: &str) -> bool {
    mime.starts_with("text/") || mime == "application/json" || mime == "application/xml"
}

#[cfg(test)]
mod tests {
    use super::*;
    use docroute_config::DocrouteConfig;
    use docroute_memory::InMemoryContextStore;
    use docroute_protocol::IntentLabel;
    use docroute_test_utils::fixtures::{INVOICE_JSON, INVOICE_PDF_TEXT, PDF_MAGIC, RFQ_EMAIL};
    use pretty_assertions::assert_eq;

    struct FixedConverter(&'static str);

    impl PdfTextConverter for FixedConverter {
        fn convert(&self, _bytes: &[u8]) -> Result<String, IntakeError> {
            Ok(self.0.to_string())
        }
    }

    fn intake() -> FileIntake {
        let router = DocumentRouter::from_config(
            &DocrouteConfig::default(),
            Arc::new(InMemoryContextStore::new()),
        )
        .expect("router");
        FileIntake::new(router, Arc::new(FixedConverter(INVOICE_PDF_TEXT)))
    }

    #[test]
    fn sniffed_pdf_is_converted_and_hinted() {
        let result = intake()
            .submit_file(PDF_MAGIC, None, Some("t".to_string()))
            .expect("route");
        assert_eq!(result.classification.format, FormatTag::PdfText);
        assert_eq!(result.classification.intent, IntentLabel::Invoice);
        assert_eq!(result.thread_id.as_deref(), Some("t"));
    }

    #[test]
    fn declared_pdf_mime_is_converted() {
        let result = intake()
            .submit_file(b"not really a pdf", Some("Application/PDF; x=1"), None)
            .expect("route");
        assert_eq!(result.processing_result.handler_name(), "pdf_text");
    }

    #[test]
    fn text_uploads_route_by_content() {
        let intake = intake();
        let result = intake
            .submit_file(RFQ_EMAIL.as_bytes(), Some("text/plain"), None)
            .expect("route");
        assert_eq!(result.classification.format, FormatTag::Email);

        let with_bom = format!("{UTF8_BOM}{INVOICE_JSON}");
        let result = intake
            .submit_file(with_bom.as_bytes(), None, None)
            .expect("route");
        assert_eq!(result.classification.format, FormatTag::StructuredData);
    }

    #[test]
    fn rejects_binary_and_invalid_payloads() {
        let intake = intake();
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert!(matches!(
            intake.submit_file(&png, None, None),
            Err(IntakeError::Binary(_))
        ));
        assert!(matches!(
            intake.submit_file(&[0xff, 0xfe, 0xfd], None, None),
            Err(IntakeError::NotText)
        ));
        assert!(matches!(
            intake.submit_file(b"", None, None),
            Err(IntakeError::EmptyFile)
        ));
        assert!(matches!(
            intake.submit_file(b"   ", None, None),
            Err(IntakeError::Core(CoreError::EmptyContent))
        ));
    }

    #[test]
    fn real_converter_rejects_garbage() {
        let err = PdfExtractConverter
            .convert(b"%PDF-1.7\ngarbage")
            .unwrap_err();
        assert!(matches!(err, IntakeError::PdfConversion(_)));
    }
}
