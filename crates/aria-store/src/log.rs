//! Fire-and-forget recorder handle for completed turns.

use crate::pool::DbPool;
use crate::record::{insert_interaction, InteractionRecord};

/// Handle for recording completed turns without blocking the caller.
///
/// Cloneable; every clone shares the same pool. A write happens on a spawned
/// blocking task: the caller returns immediately, and a failed write is
/// logged at warn and discarded. Concurrent records are independent inserts,
/// so no coordination is needed beyond the pool itself.
#[derive(Debug, Clone)]
pub struct InteractionLog {
    pool: DbPool,
}

impl InteractionLog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Records a completed turn in the background.
    ///
    /// Never fails from the caller's point of view: pool exhaustion, SQL
    /// errors, and task failures are all absorbed here.
    pub fn record(&self, record: InteractionRecord) {
        let pool = self.pool.clone();

        tokio::spawn(async move {
            let user_id = record.user_id.clone();
            let result = tokio::task::spawn_blocking(move || {
                let conn = pool.get()?;
                insert_interaction(&conn, &record)
            })
            .await;

            match result {
                Ok(Ok(id)) => {
                    tracing::debug!(user_id = %user_id, row_id = id, "interaction recorded");
                }
                Ok(Err(e)) => {
                    tracing::warn!(user_id = %user_id, "failed to record interaction: {}", e);
                }
                Err(e) => {
                    tracing::warn!(
                        user_id = %user_id,
                        "interaction record task panicked or was cancelled: {}",
                        e
                    );
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::pool::create_pool;
    use crate::record::recent_interactions;
    use aria_types::{AnimationCue, EmotionTag};
    use chrono::Utc;
    use std::time::Duration;

    fn sample() -> InteractionRecord {
        InteractionRecord {
            user_id: "user-1".to_string(),
            timestamp: Utc::now(),
            user_input: "hello".to_string(),
            response_text: "hi".to_string(),
            emotion: EmotionTag::Happy,
            animation: AnimationCue::Wave,
        }
    }

    /// Polls until the row count reaches `expected` or the deadline passes.
    async fn wait_for_rows(pool: &DbPool, expected: usize) -> usize {
        for _ in 0..50 {
            let count = {
                let conn = pool.get().expect("conn");
                recent_interactions(&conn, 100).expect("read").len()
            };
            if count >= expected {
                return count;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        0
    }

    #[tokio::test]
    async fn record_lands_in_the_table() {
        let db_file = tempfile::NamedTempFile::new().expect("temp db");
        let path = db_file.path().to_str().expect("path").to_string();

        let pool = create_pool(&path, 4).expect("pool");
        run_migrations(&pool.get().expect("conn")).expect("migrate");

        let log = InteractionLog::new(pool.clone());
        log.record(sample());

        assert_eq!(wait_for_rows(&pool, 1).await, 1);
    }

    #[tokio::test]
    async fn record_absorbs_write_failure() {
        // Pool without migrations: the insert has no table to land in.
        let db_file = tempfile::NamedTempFile::new().expect("temp db");
        let path = db_file.path().to_str().expect("path").to_string();
        let pool = create_pool(&path, 2).expect("pool");

        let log = InteractionLog::new(pool);
        log.record(sample());

        // Nothing to observe but the absence of a panic; give the spawned
        // task a moment to run its failure path.
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
