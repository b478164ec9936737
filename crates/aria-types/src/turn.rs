//! Inbound utterances and the completed turn result.

use crate::emotion::{AnimationCue, EmotionTag};
use serde::{Deserialize, Serialize};

/// A single unit of user input entering the turn pipeline.
///
/// Audio utterances carry the raw payload together with the client-declared
/// content type and file name; text utterances are used as-is. An utterance
/// is consumed by exactly one pipeline run and never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Utterance {
    Audio {
        data: Vec<u8>,
        content_type: String,
        file_name: String,
    },
    Text(String),
}

impl Utterance {
    /// Convenience constructor for a text utterance.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

/// The complete output of one conversational turn.
///
/// Always fully populated: the pipeline either produces all four fields or
/// fails without producing a result. `audio_output` is the synthesized reply
/// audio, base64-encoded for JSON transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub response_text: String,
    pub emotion: EmotionTag,
    pub animation: AnimationCue,
    pub audio_output: String,
}
