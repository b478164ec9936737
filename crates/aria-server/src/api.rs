//! Single-turn conversation API.

use crate::spool::TransientAudio;
use crate::AppState;
use aria_dialogue::DialogueError;
use aria_types::{TurnResult, Utterance};
use axum::{
    extract::{Extension, Json, Multipart},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// User identity recorded for turns arriving over the single-shot endpoint.
pub const REST_USER_ID: &str = "rest_user";

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<DialogueError> for ApiError {
    fn from(e: DialogueError) -> Self {
        ApiError::InternalServerError(format!("turn failed at {} stage: {e}", e.stage()))
    }
}

/// Handler for `POST /conversation`.
///
/// Accepts one multipart audio upload (field `file`), runs the turn
/// pipeline on it, and returns the completed [`TurnResult`]. Non-audio
/// content types are rejected before any pipeline stage runs. Exactly one
/// spool file is created and removed per request, whatever the outcome.
pub async fn conversation_handler(
    Extension(state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<TurnResult>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let content_type = field.content_type().unwrap_or("").to_string();
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
            upload = Some((content_type, file_name, data));
            break;
        }
    }

    let (content_type, file_name, data) =
        upload.ok_or_else(|| ApiError::BadRequest("missing audio file field".to_string()))?;

    if !content_type.starts_with("audio/") {
        return Err(ApiError::BadRequest(format!(
            "file provided is not an audio file (content type: {content_type})"
        )));
    }

    let spool = TransientAudio::create(
        &state.spool_dir,
        &format!("rest-{}", Uuid::new_v4()),
        &data,
    )
    .map_err(|e| ApiError::InternalServerError(format!("failed to spool upload: {e}")))?;

    let payload = spool
        .read()
        .map_err(|e| ApiError::InternalServerError(format!("failed to read spooled upload: {e}")))?;

    let result = state
        .pipeline
        .process(
            Utterance::Audio {
                data: payload,
                content_type,
                file_name,
            },
            REST_USER_ID,
        )
        .await;

    match &result {
        Ok(_) => {}
        Err(e) => {
            tracing::error!(stage = e.stage(), "single-turn request failed: {}", e);
        }
    }

    // `spool` drops here on every path, deleting the temp file before the
    // response (success or error) leaves the handler.
    drop(spool);

    Ok(Json(result?))
}
