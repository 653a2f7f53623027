//! Document generation routes.
//!
//! Create and update both answer with an SSE stream: the generation runs
//! in a spawned task feeding a channel the response drains, so deltas
//! reach the client as the provider produces them. Input problems the
//! route can see up front (unknown kind, missing document) still get a
//! plain JSON error before the stream starts.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::instrument;

use optima_artifacts::DeltaWriter;
use optima_store::row_types::DocumentRow;

use crate::errors::ApiError;
use crate::sse::sse_from_channel;
use crate::state::AppState;

/// Event buffer between the generation task and the SSE drain.
const CHANNEL_BUFFER: usize = 64;

/// Body of `POST /api/documents`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
    /// Document title, doubles as the generation prompt.
    pub title: String,
    /// Document kind (`text` | `svg` | `diagram` | `image`).
    pub kind: String,
}

/// Body of `POST /api/documents/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
    /// What to change.
    pub description: String,
}

/// `POST /api/documents`: generate a new document, streaming deltas.
#[instrument(skip_all, fields(kind = %body.kind))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.title.trim().is_empty() {
        return Err(ApiError::InvalidParams("title must not be empty".into()));
    }
    state.artifacts.ensure_kind(&body.kind)?;

    let (writer, rx) = DeltaWriter::channel(CHANNEL_BUFFER);
    let service = state.artifacts.clone();
    drop(tokio::spawn(async move {
        // Terminal error events are already emitted by the service.
        let _ = service
            .create_document(&body.title, &body.kind, &writer)
            .await;
    }));
    Ok(sse_from_channel(rx))
}

/// `POST /api/documents/{id}`: revise an existing document, streaming deltas.
#[instrument(skip_all, fields(id = %id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.description.trim().is_empty() {
        return Err(ApiError::InvalidParams(
            "description must not be empty".into(),
        ));
    }
    // Surface a missing document as a plain 404 before streaming.
    let _ = state.artifacts.get_document(&id)?;

    let (writer, rx) = DeltaWriter::channel(CHANNEL_BUFFER);
    let service = state.artifacts.clone();
    drop(tokio::spawn(async move {
        let _ = service.update_document(&id, &body.description, &writer).await;
    }));
    Ok(sse_from_channel(rx))
}

/// `GET /api/documents/{id}`: fetch a stored document.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentRow>, ApiError> {
    Ok(Json(state.artifacts.get_document(&id)?))
}
