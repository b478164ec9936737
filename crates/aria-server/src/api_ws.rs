//! WebSocket session handler: the persistent-channel surface.
//!
//! A connection carries a sequence of independent turns for one user. Each
//! inbound frame, UTF-8 text or binary audio, runs the turn pipeline and
//! yields exactly one JSON reply frame. A clean remote close ends the
//! session silently; a pipeline failure or socket fault closes it with an
//! abnormal status. Binary frames are spooled to disk for the duration of
//! their turn and the spool file is always removed before the next frame is
//! read.

use crate::spool::TransientAudio;
use crate::AppState;
use aria_dialogue::DialogueError;
use aria_types::{TurnResult, Utterance};
use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket},
        Extension, Path, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use std::sync::Arc;

/// Close reason sent when a turn fails on the persistent channel.
const ABNORMAL_CLOSE_REASON: &str = "turn processing failed";

/// Handler for `GET /ws/{userId}`.
pub async fn ws_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(user_id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_session(socket, state, user_id))
}

/// Drives the turn pipeline for one connection until it ends.
async fn handle_session(mut socket: WebSocket, state: Arc<AppState>, user_id: String) {
    tracing::info!(user_id = %user_id, "websocket session opened");

    // Per-connection discriminator so back-to-back binary frames never
    // share a spool file name.
    let mut frame_seq: u64 = 0;

    while let Some(frame) = socket.recv().await {
        let frame = match frame {
            Ok(f) => f,
            Err(e) => {
                // The remote went away mid-frame; nothing left to answer.
                tracing::info!(user_id = %user_id, "websocket receive error, ending session: {}", e);
                break;
            }
        };

        let turn = match frame {
            Message::Text(text) => {
                state
                    .pipeline
                    .process(Utterance::Text(text.to_string()), &user_id)
                    .await
            }
            Message::Binary(data) => {
                frame_seq += 1;
                audio_turn(&state, &user_id, frame_seq, &data).await
            }
            Message::Close(_) => break,
            // Protocol-level frames; axum answers pings itself.
            _ => continue,
        };

        let reply = match turn {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    stage = e.stage(),
                    "turn failed on websocket session, closing: {}",
                    e
                );
                close_abnormally(socket).await;
                return;
            }
        };

        match send_reply(&mut socket, &user_id, &reply).await {
            SendOutcome::Sent => {}
            SendOutcome::ClientGone => break,
            SendOutcome::Fault => {
                close_abnormally(socket).await;
                return;
            }
        }
    }

    tracing::info!(user_id = %user_id, "websocket session closed");
}

/// Spools one binary audio frame and runs the pipeline on it.
///
/// The spool file lives exactly as long as this call: it is removed on
/// success and on every failure path before the caller sees the result.
async fn audio_turn(
    state: &AppState,
    user_id: &str,
    frame_seq: u64,
    data: &[u8],
) -> Result<TurnResult, DialogueError> {
    let tag = format!("ws-{user_id}-{frame_seq}");

    let spool = TransientAudio::create(&state.spool_dir, &tag, data)
        .map_err(|e| DialogueError::Transcription(format!("failed to spool audio frame: {e}")))?;

    let payload = spool
        .read()
        .map_err(|e| DialogueError::Transcription(format!("failed to read spooled frame: {e}")))?;

    state
        .pipeline
        .process(
            Utterance::Audio {
                data: payload,
                content_type: "audio/wav".to_string(),
                file_name: format!("{tag}.wav"),
            },
            user_id,
        )
        .await
}

/// What happened to an outbound reply frame.
enum SendOutcome {
    Sent,
    /// The remote disconnected before the reply went out; end cleanly.
    ClientGone,
    /// Unexpected local failure; the session should close abnormally.
    Fault,
}

/// Serializes and sends one reply frame.
async fn send_reply(socket: &mut WebSocket, user_id: &str, reply: &TurnResult) -> SendOutcome {
    let json = match serde_json::to_string(reply) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(user_id = %user_id, "failed to serialize turn reply: {}", e);
            return SendOutcome::Fault;
        }
    };

    if let Err(e) = socket.send(Message::Text(json.into())).await {
        tracing::info!(user_id = %user_id, "client went away before reply: {}", e);
        return SendOutcome::ClientGone;
    }

    SendOutcome::Sent
}

/// Closes the socket with an abnormal status (1011).
async fn close_abnormally(mut socket: WebSocket) {
    let frame = CloseFrame {
        code: close_code::ERROR,
        reason: ABNORMAL_CLOSE_REASON.into(),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        tracing::debug!("failed to send abnormal close frame: {}", e);
    }
}
