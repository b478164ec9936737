use crate::config::{key_configured, GenerationConfig};
use crate::error::DialogueError;
use crate::stt::truncate;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Timeout for a generation request.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are a friendly and helpful AR assistant.";

/// Reply served when no generation engine is configured.
pub const FALLBACK_REPLY: &str =
    "This is a dummy response because the language engine is not configured.";

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    config: GenerationConfig,
    client: reqwest::Client,
}

impl GenerationClient {
    pub fn new(config: GenerationConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn is_configured(&self) -> bool {
        key_configured(&self.config.api_key)
    }

    /// Generates a conversational reply to the user's text.
    ///
    /// Unconfigured engine: returns [`FALLBACK_REPLY`]. An error during an
    /// attempted call fails the turn.
    pub async fn generate(&self, user_text: &str) -> Result<String, DialogueError> {
        if !self.is_configured() {
            tracing::warn!("generation engine not configured, serving fallback reply");
            return Ok(FALLBACK_REPLY.to_string());
        }

        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_text },
            ],
            "max_tokens": self.config.max_tokens,
        });

        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .timeout(GENERATION_TIMEOUT)
            .send()
            .await
            .map_err(|e| DialogueError::Generation(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DialogueError::Generation(format!(
                "engine returned {status}: {}",
                truncate(&body)
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| DialogueError::Generation(format!("unparsable response: {e}")))?;

        let reply = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DialogueError::Generation("engine returned no choices".to_string()))?;

        Ok(reply.trim().to_string())
    }
}
