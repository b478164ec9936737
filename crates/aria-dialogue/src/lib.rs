//! Turn processing for the Aria platform.
//!
//! Wraps the four external engines the assistant depends on (speech-to-text
//! transcription, chat response generation, emotion classification, and
//! speech synthesis) behind narrow adapter types, and composes them into
//! the [`TurnPipeline`]: one ordered transformation from an inbound
//! utterance to a complete [`aria_types::TurnResult`].
//!
//! # Degraded operation
//!
//! Each adapter decides for itself what happens when its engine was never
//! configured: it returns a documented placeholder instead of failing, so a
//! development deployment with no API keys still completes every turn.
//! Errors during an *attempted* engine call escalate as [`DialogueError`],
//! except emotion classification, which always resolves to a tag.

pub mod config;
pub mod emotion;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod stt;
pub mod tts;

pub use config::{
    ClassifierConfig, EnginesConfig, GenerationConfig, SynthesisConfig, TranscriptionConfig,
};
pub use emotion::EmotionClassifier;
pub use error::DialogueError;
pub use llm::{GenerationClient, FALLBACK_REPLY, SYSTEM_PROMPT};
pub use pipeline::TurnPipeline;
pub use stt::{TranscriptionClient, FALLBACK_TRANSCRIPT};
pub use tts::{SynthesisClient, FALLBACK_AUDIO};
