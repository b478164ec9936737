//! Emotion and animation vocabularies.
//!
//! Both enums are closed sets: whatever an upstream classifier emits is
//! funnelled into [`EmotionTag`] before it reaches the rest of the system,
//! and every emotion resolves to exactly one [`AnimationCue`] through
//! [`animation_for`].

use serde::{Deserialize, Serialize};

/// Emotional label attached to a generated reply.
///
/// Classifier output that does not match a known label collapses to
/// [`EmotionTag::Neutral`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionTag {
    Happy,
    Sad,
    Angry,
    Neutral,
}

impl EmotionTag {
    /// Returns the canonical string label for this emotion.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for EmotionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EmotionTag {
    type Err = ParseEmotionTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "happy" => Ok(Self::Happy),
            "sad" => Ok(Self::Sad),
            "angry" => Ok(Self::Angry),
            "neutral" => Ok(Self::Neutral),
            _ => Err(ParseEmotionTagError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown emotion label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEmotionTagError(pub String);

impl std::fmt::Display for ParseEmotionTagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown emotion tag: {}", self.0)
    }
}

impl std::error::Error for ParseEmotionTagError {}

/// Animation trigger sent alongside a reply so the avatar can react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationCue {
    Wave,
    Comfort,
    AngryGesture,
    Nod,
    Idle,
}

impl AnimationCue {
    /// Returns the canonical string label for this cue.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wave => "wave",
            Self::Comfort => "comfort",
            Self::AngryGesture => "angry_gesture",
            Self::Nod => "nod",
            Self::Idle => "idle",
        }
    }
}

impl std::fmt::Display for AnimationCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnimationCue {
    type Err = ParseAnimationCueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wave" => Ok(Self::Wave),
            "comfort" => Ok(Self::Comfort),
            "angry_gesture" => Ok(Self::AngryGesture),
            "nod" => Ok(Self::Nod),
            "idle" => Ok(Self::Idle),
            _ => Err(ParseAnimationCueError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown animation label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAnimationCueError(pub String);

impl std::fmt::Display for ParseAnimationCueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown animation cue: {}", self.0)
    }
}

impl std::error::Error for ParseAnimationCueError {}

/// Emotion-to-animation mapping table.
const EMOTION_ANIMATIONS: &[(EmotionTag, AnimationCue)] = &[
    (EmotionTag::Happy, AnimationCue::Wave),
    (EmotionTag::Sad, AnimationCue::Comfort),
    (EmotionTag::Angry, AnimationCue::AngryGesture),
    (EmotionTag::Neutral, AnimationCue::Nod),
];

/// Maps an emotion to the animation the avatar should play.
///
/// Emotions missing from the table fall back to [`AnimationCue::Idle`].
/// With the current closed [`EmotionTag`] set the fallback cannot fire,
/// but the table stays the single source of truth if the set grows.
pub fn animation_for(emotion: EmotionTag) -> AnimationCue {
    EMOTION_ANIMATIONS
        .iter()
        .find(|(tag, _)| *tag == emotion)
        .map(|(_, cue)| *cue)
        .unwrap_or(AnimationCue::Idle)
}
