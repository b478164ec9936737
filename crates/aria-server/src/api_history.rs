//! Session history read API.

use crate::api::ApiError;
use crate::AppState;
use aria_store::{recent_interactions, StoredInteraction};
use axum::extract::{Extension, Json, Query};
use serde::Deserialize;
use std::sync::Arc;

/// Default number of interactions returned (matches the client's history pane).
const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// Hard ceiling on a single history read.
const MAX_HISTORY_LIMIT: i64 = 100;

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

/// Handler for `GET /api/interactions?limit=N`.
///
/// Returns the most recent recorded turns, newest first.
pub async fn recent_interactions_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<StoredInteraction>>, ApiError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let pool = state.pool.clone();
    let rows = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| e.to_string())?;
        recent_interactions(&conn, limit).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("history task failed: {e}")))?
    .map_err(ApiError::InternalServerError)?;

    Ok(Json(rows))
}
