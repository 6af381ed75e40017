//! Route table and request handlers.

use crate::{ApiError, AppState};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use docroute_config::ServerConfig;
use docroute_memory::MemoryRecord;
use docroute_protocol::{FormatTag, ProcessingRequest, RouterResult, ThreadId};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::task;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

/// Build the HTTP router with all endpoints.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/process", post(process))
        .route("/process/file", post(process_file))
        .route("/records/{id}", get(get_record))
        .route("/threads/{thread_id}/records", get(thread_records))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));
    let router = if config.permissive_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };
    router.with_state(state)
}

/// Body accepted by `POST /process`.
#[derive(Debug, Deserialize)]
pub struct ProcessBody {
    pub content: String,
    #[serde(default)]
    pub metadata: Option<ProcessMetadata>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProcessMetadata {
    #[serde(default)]
    pub thread_id: Option<ThreadId>,
    #[serde(default)]
    pub format_hint: Option<FormatTag>,
    #[serde(default)]
    pub source: Option<String>,
}

impl From<ProcessBody> for ProcessingRequest {
    fn from(body: ProcessBody) -> Self {
        let metadata = body.metadata.unwrap_or_default();
        ProcessingRequest {
            content: body.content,
            format_hint: metadata.format_hint,
            thread_id: metadata.thread_id,
            source: metadata.source,
        }
    }
}

#[derive(Debug, Serialize)]
struct ThreadRecords {
    thread_id: ThreadId,
    records: Vec<MemoryRecord>,
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn process(
    State(state): State<AppState>,
    payload: Result<Json<ProcessBody>, JsonRejection>,
) -> Result<Json<RouterResult>, ApiError> {
    let Json(body) = payload?;
    let request = ProcessingRequest::from(body);
    let result = task::spawn_blocking(move || state.router.route(request))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;
    Ok(Json(result))
}

async fn process_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RouterResult>, ApiError> {
    let mut multipart = multipart?;
    let mut file: Option<(Vec<u8>, Option<String>)> = None;
    let mut thread_id: Option<ThreadId> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let content_type = field.content_type().map(str::to_string);
                debug!(
                    "multipart file field (file_name={}, content_type={})",
                    field.file_name().unwrap_or("unnamed"),
                    content_type.as_deref().unwrap_or("none")
                );
                let bytes = field.bytes().await?;
                file = Some((bytes.to_vec(), content_type));
            }
            Some("thread_id") => {
                let value = field.text().await?;
                let value = value.trim();
                if !value.is_empty() {
                    thread_id = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    let Some((bytes, content_type)) = file else {
        return Err(ApiError::BadRequest("missing `file` field".to_string()));
    };
    let result = task::spawn_blocking(move || {
        state
            .intake
            .submit_file(&bytes, content_type.as_deref(), thread_id)
    })
    .await
    .map_err(|err| ApiError::Internal(err.to_string()))??;
    Ok(Json(result))
}

async fn get_record(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MemoryRecord>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.router.get_record(id)?))
}

async fn thread_records(
    State(state): State<AppState>,
    Path(thread_id): Path<ThreadId>,
) -> Json<ThreadRecords> {
    let records = state.router.thread_history(&thread_id);
    Json(ThreadRecords { thread_id, records })
}
