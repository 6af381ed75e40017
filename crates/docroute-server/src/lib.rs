//! HTTP surface for docroute.
//!
//! Exposes JSON and multipart intake endpoints plus record lookups on top of
//! a [`docroute_core::DocumentRouter`].

mod error;
mod routes;
mod state;
pub mod upload;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
pub use upload::{FileIntake, IntakeError, PdfExtractConverter, PdfTextConverter};

use docroute_config::ServerConfig;
use log::{info, warn};
use tokio::net::TcpListener;

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<(), std::io::Error> {
    let app = build_router(state, config);
    let listener = TcpListener::bind(&config.bind).await?;
    info!("http server listening (addr={})", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("http server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => warn!("failed to listen for ctrl-c (error={err})"),
    }
}
