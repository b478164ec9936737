use crate::config::{key_configured, TranscriptionConfig};
use crate::error::DialogueError;
use serde::Deserialize;
use std::time::Duration;

/// Maximum audio input size for transcription (10 MiB). Prevents OOM from
/// oversized payloads.
const MAX_TRANSCRIPTION_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Timeout for a transcription request.
const TRANSCRIPTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Transcript served when no transcription engine is configured.
pub const FALLBACK_TRANSCRIPT: &str =
    "This is a dummy transcript because the transcription engine is not configured.";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Client for an OpenAI-compatible speech-to-text endpoint.
#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    config: TranscriptionConfig,
    client: reqwest::Client,
}

impl TranscriptionClient {
    pub fn new(config: TranscriptionConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn is_configured(&self) -> bool {
        key_configured(&self.config.api_key)
    }

    /// Transcribes one audio payload to text.
    ///
    /// Unconfigured engine: returns [`FALLBACK_TRANSCRIPT`]. An error during
    /// an attempted call (including an oversized payload) fails the turn.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        content_type: &str,
        file_name: &str,
    ) -> Result<String, DialogueError> {
        if !self.is_configured() {
            tracing::warn!("transcription engine not configured, serving fallback transcript");
            return Ok(FALLBACK_TRANSCRIPT.to_string());
        }

        if audio.len() > MAX_TRANSCRIPTION_INPUT_BYTES {
            return Err(DialogueError::Transcription(format!(
                "audio data exceeds maximum size: {} bytes (limit: {} bytes)",
                audio.len(),
                MAX_TRANSCRIPTION_INPUT_BYTES
            )));
        }

        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| {
                DialogueError::Transcription(format!("invalid audio content type: {e}"))
            })?;

        let form = reqwest::multipart::Form::new()
            .text("model", self.config.model.clone())
            .part("file", part);

        let url = format!(
            "{}/audio/transcriptions",
            self.config.api_base.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .timeout(TRANSCRIPTION_TIMEOUT)
            .send()
            .await
            .map_err(|e| DialogueError::Transcription(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DialogueError::Transcription(format!(
                "engine returned {status}: {}",
                truncate(&body)
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| DialogueError::Transcription(format!("unparsable response: {e}")))?;

        Ok(parsed.text)
    }
}

/// Bounds error bodies quoted back into our own error messages.
pub(crate) fn truncate(body: &str) -> &str {
    let max = 200;
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
