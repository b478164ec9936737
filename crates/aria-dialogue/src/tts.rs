use crate::config::{key_configured, SynthesisConfig};
use crate::error::DialogueError;
use crate::stt::truncate;
use serde_json::json;
use std::time::Duration;

/// Maximum text input size for synthesis (64 KiB). Prevents resource
/// exhaustion from oversized synthesis requests.
const MAX_SYNTHESIS_INPUT_BYTES: usize = 64 * 1024;

/// Timeout for a synthesis request.
const SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(60);

/// Audio payload served when no synthesis engine is configured.
pub const FALLBACK_AUDIO: &[u8] = b"dummy_audio_data";

/// Client for an OpenAI-compatible text-to-speech endpoint.
#[derive(Debug, Clone)]
pub struct SynthesisClient {
    config: SynthesisConfig,
    client: reqwest::Client,
}

impl SynthesisClient {
    pub fn new(config: SynthesisConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn is_configured(&self) -> bool {
        key_configured(&self.config.api_key)
    }

    /// Synthesizes speech audio for the given text.
    ///
    /// Unconfigured engine: returns [`FALLBACK_AUDIO`]. An error during an
    /// attempted call (including oversized text) fails the turn.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, DialogueError> {
        if !self.is_configured() {
            tracing::warn!("synthesis engine not configured, serving fallback audio");
            return Ok(FALLBACK_AUDIO.to_vec());
        }

        if text.len() > MAX_SYNTHESIS_INPUT_BYTES {
            return Err(DialogueError::Synthesis(format!(
                "text exceeds maximum size: {} bytes (limit: {} bytes)",
                text.len(),
                MAX_SYNTHESIS_INPUT_BYTES
            )));
        }

        let body = json!({
            "model": self.config.model,
            "input": text,
            "voice": self.config.voice,
        });

        let url = format!("{}/audio/speech", self.config.api_base.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .timeout(SYNTHESIS_TIMEOUT)
            .send()
            .await
            .map_err(|e| DialogueError::Synthesis(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DialogueError::Synthesis(format!(
                "engine returned {status}: {}",
                truncate(&body)
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| DialogueError::Synthesis(format!("failed to read audio body: {e}")))?;

        Ok(audio.to_vec())
    }
}
