//! Pipeline behavior with unconfigured engines and a real store.
//!
//! No engine credentials are set here, so every adapter serves its
//! placeholder and the pipeline must still complete end to end.

use aria_dialogue::{
    EnginesConfig, TurnPipeline, FALLBACK_AUDIO, FALLBACK_REPLY, FALLBACK_TRANSCRIPT,
};
use aria_store::{create_pool, recent_interactions, run_migrations, DbPool, InteractionLog};
use aria_types::{AnimationCue, EmotionTag, Utterance};
use base64::Engine;
use std::time::Duration;

fn migrated_pool() -> (DbPool, tempfile::NamedTempFile) {
    let db_file = tempfile::NamedTempFile::new().expect("temp db");
    let path = db_file.path().to_str().expect("path").to_string();
    let pool = create_pool(&path, 4).expect("pool");
    run_migrations(&pool.get().expect("conn")).expect("migrate");
    (pool, db_file)
}

fn unconfigured_pipeline(pool: DbPool) -> TurnPipeline {
    TurnPipeline::new(EnginesConfig::default(), InteractionLog::new(pool)).expect("pipeline")
}

async fn wait_for_rows(pool: &DbPool, expected: usize) -> Vec<aria_store::StoredInteraction> {
    for _ in 0..50 {
        let rows = {
            let conn = pool.get().expect("conn");
            recent_interactions(&conn, 100).expect("read")
        };
        if rows.len() >= expected {
            return rows;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("expected {expected} recorded interactions");
}

#[tokio::test]
async fn text_turn_completes_on_placeholders() {
    let (pool, _db) = migrated_pool();
    let pipeline = unconfigured_pipeline(pool);

    let result = pipeline
        .process(Utterance::text("hello"), "user-1")
        .await
        .expect("turn should complete without any engine configured");

    assert_eq!(result.response_text, FALLBACK_REPLY);
    assert_eq!(result.emotion, EmotionTag::Neutral);
    assert_eq!(result.animation, AnimationCue::Nod);
    assert_eq!(
        result.audio_output,
        base64::engine::general_purpose::STANDARD.encode(FALLBACK_AUDIO)
    );
}

#[tokio::test]
async fn audio_turn_serves_fallback_transcript() {
    let (pool, _db) = migrated_pool();
    let pipeline = unconfigured_pipeline(pool.clone());

    let utterance = Utterance::Audio {
        data: vec![0u8; 256],
        content_type: "audio/wav".to_string(),
        file_name: "frame.wav".to_string(),
    };

    let result = pipeline
        .process(utterance, "user-2")
        .await
        .expect("audio turn should complete");

    assert_eq!(result.response_text, FALLBACK_REPLY);

    // The recorded turn carries the placeholder transcript as the input.
    let rows = wait_for_rows(&pool, 1).await;
    assert_eq!(rows[0].user_input, FALLBACK_TRANSCRIPT);
}

#[tokio::test]
async fn completed_turn_is_recorded() {
    let (pool, _db) = migrated_pool();
    let pipeline = unconfigured_pipeline(pool.clone());

    pipeline
        .process(Utterance::text("log me"), "user-3")
        .await
        .expect("turn should complete");

    let rows = wait_for_rows(&pool, 1).await;
    assert_eq!(rows[0].user_id, "user-3");
    assert_eq!(rows[0].user_input, "log me");
    assert_eq!(rows[0].response_text, FALLBACK_REPLY);
    assert_eq!(rows[0].emotion, "neutral");
    assert_eq!(rows[0].animation, "nod");
}

#[tokio::test]
async fn recorder_failure_does_not_affect_the_turn() {
    // A pool with no schema: every recorder write fails.
    let db_file = tempfile::NamedTempFile::new().expect("temp db");
    let path = db_file.path().to_str().expect("path").to_string();
    let pool = create_pool(&path, 2).expect("pool");

    let pipeline = unconfigured_pipeline(pool);

    let result = pipeline
        .process(Utterance::text("hello"), "user-4")
        .await
        .expect("turn must succeed even when recording fails");

    assert_eq!(result.response_text, FALLBACK_REPLY);
    assert_eq!(result.emotion, EmotionTag::Neutral);
    assert_eq!(result.animation, AnimationCue::Nod);
    assert_eq!(
        result.audio_output,
        base64::engine::general_purpose::STANDARD.encode(FALLBACK_AUDIO)
    );
}
