use crate::upload::{FileIntake, PdfExtractConverter, PdfTextConverter};
use docroute_core::DocumentRouter;
use std::sync::Arc;

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub router: DocumentRouter,
    pub intake: FileIntake,
}

impl AppState {
    /// State using the `pdf-extract` converter for uploads.
    pub fn new(router: DocumentRouter) -> Self {
        Self::with_converter(router, Arc::new(PdfExtractConverter))
    }

    pub fn with_converter(router: DocumentRouter, converter: Arc<dyn PdfTextConverter>) -> Self {
        let intake = FileIntake::new(router.clone(), converter);
        Self { router, intake }
    }
}
