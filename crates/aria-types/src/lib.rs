//! Shared domain types for the Aria platform.
//!
//! Defines the closed emotion and animation vocabularies, the inbound
//! [`Utterance`] union, and the [`TurnResult`] returned to clients after a
//! completed conversational turn. These types carry no I/O; every other
//! crate in the workspace builds on them.

mod emotion;
mod turn;

pub use emotion::{
    animation_for, AnimationCue, EmotionTag, ParseAnimationCueError, ParseEmotionTagError,
};
pub use turn::{TurnResult, Utterance};
