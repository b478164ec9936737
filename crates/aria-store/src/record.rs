//! Interaction records: write model, read model, and the SQL that moves them.

use aria_types::{AnimationCue, EmotionTag};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::error::StoreError;

/// One completed turn, as handed to the recorder by the pipeline.
///
/// Write-once: constructed after a successful pipeline run, persisted, never
/// read back by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRecord {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub user_input: String,
    pub response_text: String,
    pub emotion: EmotionTag,
    pub animation: AnimationCue,
}

/// One persisted turn, as returned by the history read path.
///
/// Emotion and animation come back as the stored string labels rather than
/// the closed enums: the read model reports what was written, it does not
/// re-validate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredInteraction {
    pub user_id: String,
    pub user_input: String,
    pub response_text: String,
    pub emotion: String,
    pub animation: String,
    pub timestamp: String,
}

/// Writes a single interaction to the log.
///
/// Returns the assigned row id.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn insert_interaction(
    conn: &Connection,
    record: &InteractionRecord,
) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO interactions
            (user_id, user_input, response_text, emotion, animation, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.user_id,
            record.user_input,
            record.response_text,
            record.emotion.as_str(),
            record.animation.as_str(),
            record.timestamp.to_rfc3339(),
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Returns the most recent interactions, newest first, bounded by `limit`.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn recent_interactions(
    conn: &Connection,
    limit: i64,
) -> Result<Vec<StoredInteraction>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT user_id, user_input, response_text, emotion, animation, created_at
         FROM interactions
         ORDER BY id DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map([limit], |row| {
        Ok(StoredInteraction {
            user_id: row.get(0)?,
            user_input: row.get(1)?,
            response_text: row.get(2)?,
            emotion: row.get(3)?,
            animation: row.get(4)?,
            timestamp: row.get(5)?,
        })
    })?;

    let mut interactions = Vec::new();
    for row in rows {
        interactions.push(row?);
    }

    Ok(interactions)
}
