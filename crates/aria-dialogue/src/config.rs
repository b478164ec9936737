//! Engine endpoint configuration.
//!
//! Each engine gets its own section so deployments can mix providers (for
//! example a local OpenAI-compatible gateway for generation but the hosted
//! inference API for classification). An empty `api_key` means the engine is
//! not configured; the owning adapter then serves its placeholder output
//! instead of calling out.

use serde::Deserialize;
use std::fmt;

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_hf_base() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_generation_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_classifier_model() -> String {
    "michellejieli/emotion_text_classifier".to_string()
}

fn default_synthesis_model() -> String {
    "tts-1".to_string()
}

fn default_voice() -> String {
    "alloy".to_string()
}

/// Speech-to-text engine settings (OpenAI-compatible transcription API).
#[derive(Clone, Deserialize)]
pub struct TranscriptionConfig {
    #[serde(default = "default_openai_base")]
    pub api_base: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_transcription_model")]
    pub model: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_base: default_openai_base(),
            api_key: String::new(),
            model: default_transcription_model(),
        }
    }
}

impl fmt::Debug for TranscriptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptionConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .finish()
    }
}

/// Chat response generation settings (OpenAI-compatible chat completions).
#[derive(Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_openai_base")]
    pub api_base: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// Token budget for a single reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_base: default_openai_base(),
            api_key: String::new(),
            model: default_generation_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Emotion classification settings (Hugging-Face-style inference API).
#[derive(Clone, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_hf_base")]
    pub api_base: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_classifier_model")]
    pub model: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_base: default_hf_base(),
            api_key: String::new(),
            model: default_classifier_model(),
        }
    }
}

impl fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .finish()
    }
}

/// Speech synthesis settings (OpenAI-compatible speech API).
#[derive(Clone, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default = "default_openai_base")]
    pub api_base: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_synthesis_model")]
    pub model: String,
    #[serde(default = "default_voice")]
    pub voice: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            api_base: default_openai_base(),
            api_key: String::new(),
            model: default_synthesis_model(),
            voice: default_voice(),
        }
    }
}

impl fmt::Debug for SynthesisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesisConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("voice", &self.voice)
            .finish()
    }
}

/// All engine settings, one section per engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnginesConfig {
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub classification: ClassifierConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

fn redact(key: &str) -> &'static str {
    if key.is_empty() {
        "<unset>"
    } else {
        "[REDACTED]"
    }
}

/// Returns true when the key counts as configured.
pub(crate) fn key_configured(api_key: &str) -> bool {
    !api_key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unconfigured() {
        let engines = EnginesConfig::default();
        assert!(!key_configured(&engines.transcription.api_key));
        assert!(!key_configured(&engines.generation.api_key));
        assert!(!key_configured(&engines.classification.api_key));
        assert!(!key_configured(&engines.synthesis.api_key));
        assert_eq!(engines.generation.max_tokens, 150);
        assert_eq!(engines.transcription.model, "whisper-1");
    }

    #[test]
    fn debug_redacts_api_keys() {
        let config = GenerationConfig {
            api_key: "sk-secret".to_string(),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"), "key leaked in: {debug}");
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let engines: EnginesConfig = toml::from_str(
            r#"
            [generation]
            api_key = "sk-test"
            model = "gpt-4o-mini"
        "#,
        )
        .expect("parse");

        assert!(key_configured(&engines.generation.api_key));
        assert_eq!(engines.generation.model, "gpt-4o-mini");
        assert_eq!(engines.generation.max_tokens, 150);
        assert_eq!(engines.synthesis.voice, "alloy");
        assert!(engines
            .classification
            .api_base
            .contains("huggingface"));
    }
}
