//! Emotion classification over generated replies.
//!
//! This adapter is infallible by contract: whether the failure is missing
//! configuration, a transport error, or an unrecognized label, the answer
//! is [`EmotionTag::Neutral`]. A turn never aborts because its emotional
//! coloring could not be determined.

use crate::config::{key_configured, ClassifierConfig};
use aria_types::EmotionTag;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Timeout for a classification request.
const CLASSIFICATION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// The inference API returns `[[{label, score}, ...]]` for single inputs;
/// some deployments flatten the outer list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifierResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassifierResponse {
    fn top_label(self) -> Option<String> {
        let predictions = match self {
            Self::Nested(mut outer) => {
                if outer.is_empty() {
                    return None;
                }
                outer.remove(0)
            }
            Self::Flat(inner) => inner,
        };

        predictions
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|p| p.label)
    }
}

/// Maps a raw classifier label into the closed emotion set.
fn emotion_from_label(label: &str) -> EmotionTag {
    match label.to_ascii_lowercase().as_str() {
        "joy" => EmotionTag::Happy,
        "sadness" => EmotionTag::Sad,
        "anger" => EmotionTag::Angry,
        _ => EmotionTag::Neutral,
    }
}

/// Client for a Hugging-Face-style text classification endpoint.
#[derive(Debug, Clone)]
pub struct EmotionClassifier {
    config: ClassifierConfig,
    client: reqwest::Client,
}

impl EmotionClassifier {
    pub fn new(config: ClassifierConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn is_configured(&self) -> bool {
        key_configured(&self.config.api_key)
    }

    /// Classifies the emotional tone of `text`.
    ///
    /// Always returns a tag; every failure mode collapses to
    /// [`EmotionTag::Neutral`].
    pub async fn classify(&self, text: &str) -> EmotionTag {
        if !self.is_configured() {
            tracing::debug!("emotion classifier not configured, defaulting to neutral");
            return EmotionTag::Neutral;
        }

        match self.classify_inner(text).await {
            Ok(tag) => tag,
            Err(reason) => {
                tracing::warn!("emotion classification failed, defaulting to neutral: {reason}");
                EmotionTag::Neutral
            }
        }
    }

    async fn classify_inner(&self, text: &str) -> Result<EmotionTag, String> {
        let url = format!(
            "{}/models/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&json!({ "inputs": text }))
            .timeout(CLASSIFICATION_TIMEOUT)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("classifier returned {status}"));
        }

        let parsed: ClassifierResponse = response
            .json()
            .await
            .map_err(|e| format!("unparsable response: {e}"))?;

        let label = parsed
            .top_label()
            .ok_or_else(|| "classifier returned no predictions".to_string())?;

        Ok(emotion_from_label(&label))
    }
}
