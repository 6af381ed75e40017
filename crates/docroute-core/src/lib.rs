//! Format detection, intent classification and handler routing for docroute.
//!
//! The [`DocumentRouter`] ties the pieces together: it detects the format of
//! incoming content, classifies its intent, dispatches to the registered
//! [`FormatHandler`] and appends a [`docroute_memory::MemoryRecord`] to the
//! injected context store.

pub mod classifier;
pub mod detector;
pub mod error;
pub mod handlers;
mod parse;
pub mod router;
mod terms;

pub use classifier::IntentClassifier;
pub use detector::FormatDetector;
pub use error::CoreError;
pub use handlers::{
    EmailHandler, FormatHandler, HandlerRegistry, PdfTextHandler, StructuredDataHandler,
};
pub use router::DocumentRouter;
