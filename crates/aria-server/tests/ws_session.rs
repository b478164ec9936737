//! Integration tests for the persistent WebSocket channel.
//!
//! Covers the session protocol: one reply per inbound frame, clean ends on
//! remote disconnect, abnormal close on a failed turn, and spool cleanup
//! for back-to-back binary frames.

use aria_dialogue::{EnginesConfig, GenerationConfig, TurnPipeline, FALLBACK_AUDIO, FALLBACK_REPLY};
use aria_server::{app, AppState};
use aria_store::InteractionLog;
use base64::Engine;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

struct TestServer {
    addr: SocketAddr,
    spool_dir: tempfile::TempDir,
    _db_file: tempfile::NamedTempFile,
}

impl TestServer {
    fn spool_entries(&self) -> usize {
        std::fs::read_dir(self.spool_dir.path())
            .expect("read spool dir")
            .count()
    }
}

async fn setup_test_server(engines: EnginesConfig) -> TestServer {
    let db_file = tempfile::NamedTempFile::new().expect("temp db");
    let db_path = db_file.path().to_str().expect("path").to_string();

    let pool = aria_store::create_pool(&db_path, 4).expect("pool");
    aria_store::run_migrations(&pool.get().expect("conn")).expect("migrations");

    let spool_dir = tempfile::tempdir().expect("spool dir");

    let pipeline =
        TurnPipeline::new(engines, InteractionLog::new(pool.clone())).expect("pipeline");

    let state = AppState {
        pool,
        pipeline: Arc::new(pipeline),
        spool_dir: spool_dir.path().to_path_buf(),
    };

    let app = app(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    TestServer {
        addr,
        spool_dir,
        _db_file: db_file,
    }
}

async fn next_message(
    stream: &mut (impl StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
              + Unpin),
) -> Message {
    tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("timeout waiting for frame")
        .expect("stream ended")
        .expect("frame error")
}

fn assert_placeholder_reply(text: &str) {
    let parsed: serde_json::Value = serde_json::from_str(text).expect("reply should be JSON");
    assert_eq!(parsed["response_text"], FALLBACK_REPLY);
    assert_eq!(parsed["emotion"], "neutral");
    assert_eq!(parsed["animation"], "nod");
    assert_eq!(
        parsed["audio_output"],
        base64::engine::general_purpose::STANDARD.encode(FALLBACK_AUDIO)
    );
}

#[tokio::test]
async fn text_frame_yields_one_reply_then_clean_disconnect() {
    let server = setup_test_server(EnginesConfig::default()).await;

    let ws_url = format!("ws://{}/ws/user-1", server.addr);
    let (mut ws_stream, _) = connect_async(ws_url).await.expect("connect");

    ws_stream
        .send(Message::Text("hello".into()))
        .await
        .expect("send text frame");

    let reply = next_message(&mut ws_stream).await;
    match reply {
        Message::Text(text) => assert_placeholder_reply(&text),
        other => panic!("expected text reply, got: {other:?}"),
    }

    // Clean remote disconnect: the server must not answer with anything
    // abnormal.
    ws_stream.close(None).await.expect("close");
    loop {
        match ws_stream.next().await {
            None => break,
            Some(Ok(Message::Close(frame))) => {
                if let Some(frame) = frame {
                    assert_ne!(frame.code, CloseCode::Error, "unexpected abnormal close");
                }
            }
            Some(Ok(other)) => panic!("unexpected frame after close: {other:?}"),
            Some(Err(_)) => break,
        }
    }
}

#[tokio::test]
async fn connection_stays_open_across_turns() {
    let server = setup_test_server(EnginesConfig::default()).await;

    let ws_url = format!("ws://{}/ws/user-2", server.addr);
    let (mut ws_stream, _) = connect_async(ws_url).await.expect("connect");

    for greeting in ["hi", "how are you", "bye"] {
        ws_stream
            .send(Message::Text(greeting.into()))
            .await
            .expect("send");
        let reply = next_message(&mut ws_stream).await;
        assert!(matches!(reply, Message::Text(_)), "per-frame reply expected");
    }
}

#[tokio::test]
async fn binary_frames_are_spooled_independently_and_cleaned_up() {
    let server = setup_test_server(EnginesConfig::default()).await;

    let ws_url = format!("ws://{}/ws/user-3", server.addr);
    let (mut ws_stream, _) = connect_async(ws_url).await.expect("connect");

    for payload in [vec![1u8; 64], vec![2u8; 64]] {
        ws_stream
            .send(Message::Binary(payload.into()))
            .await
            .expect("send binary frame");

        let reply = next_message(&mut ws_stream).await;
        match reply {
            Message::Text(text) => assert_placeholder_reply(&text),
            other => panic!("expected text reply, got: {other:?}"),
        }

        // The reply is only sent after the turn finished, so the frame's
        // spool file must already be gone.
        assert_eq!(server.spool_entries(), 0, "spool should be empty between frames");
    }
}

#[tokio::test]
async fn failed_turn_closes_the_session_abnormally() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let dead = listener.local_addr().expect("addr");
    drop(listener);

    let engines = EnginesConfig {
        generation: GenerationConfig {
            api_base: format!("http://{dead}/v1"),
            api_key: "test-key".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let server = setup_test_server(engines).await;

    let ws_url = format!("ws://{}/ws/user-4", server.addr);
    let (mut ws_stream, _) = connect_async(ws_url).await.expect("connect");

    ws_stream
        .send(Message::Text("hello".into()))
        .await
        .expect("send");

    let frame = next_message(&mut ws_stream).await;
    match frame {
        Message::Close(Some(frame)) => {
            assert_eq!(frame.code, CloseCode::Error, "expected 1011 close");
        }
        other => panic!("expected abnormal close, got: {other:?}"),
    }
}
