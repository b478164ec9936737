//! Error types for turn processing.

use thiserror::Error;

/// Failure of an attempted engine call, tagged by pipeline stage.
///
/// "Engine not configured" is deliberately absent: that condition is handled
/// inside each adapter by returning its placeholder output. Emotion
/// classification never appears here either, since it degrades to `neutral`
/// instead of failing.
#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("engine client configuration error: {0}")]
    Config(String),

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("response generation failed: {0}")]
    Generation(String),

    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
}

impl DialogueError {
    /// Name of the pipeline stage that failed, for logs and error bodies.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Transcription(_) => "transcription",
            Self::Generation(_) => "generation",
            Self::Synthesis(_) => "synthesis",
        }
    }
}
