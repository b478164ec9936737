//! The turn pipeline: one ordered transformation from utterance to result.
//!
//! Stages run strictly in sequence because each consumes the previous
//! stage's output: transcript feeds generation, the reply feeds both
//! classification and synthesis, and the finished turn is recorded. The
//! recorder write is the only side effect and is fire-and-forget; a turn
//! never waits on it and never fails because of it.

use crate::config::EnginesConfig;
use crate::emotion::EmotionClassifier;
use crate::error::DialogueError;
use crate::llm::GenerationClient;
use crate::stt::TranscriptionClient;
use crate::tts::SynthesisClient;
use aria_store::{InteractionLog, InteractionRecord};
use aria_types::{animation_for, TurnResult, Utterance};
use base64::Engine;
use chrono::Utc;

/// Processes conversational turns against a fixed set of engine clients.
///
/// Construct one per process and share it (`Arc`) across connections and
/// requests; every call to [`TurnPipeline::process`] is an independent turn.
#[derive(Debug, Clone)]
pub struct TurnPipeline {
    transcriber: TranscriptionClient,
    generator: GenerationClient,
    classifier: EmotionClassifier,
    synthesizer: SynthesisClient,
    interactions: InteractionLog,
}

impl TurnPipeline {
    /// Builds the pipeline with one shared HTTP client across all engines.
    pub fn new(
        engines: EnginesConfig,
        interactions: InteractionLog,
    ) -> Result<Self, DialogueError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| DialogueError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            transcriber: TranscriptionClient::new(engines.transcription, client.clone()),
            generator: GenerationClient::new(engines.generation, client.clone()),
            classifier: EmotionClassifier::new(engines.classification, client.clone()),
            synthesizer: SynthesisClient::new(engines.synthesis, client),
            interactions,
        })
    }

    /// Runs one complete turn for `user_id`.
    ///
    /// On success the result carries all four fields; there is no partial
    /// result. Transcription, generation, and synthesis errors abort the
    /// turn; classification and recording never do.
    pub async fn process(
        &self,
        utterance: Utterance,
        user_id: &str,
    ) -> Result<TurnResult, DialogueError> {
        let user_input = match utterance {
            Utterance::Audio {
                data,
                content_type,
                file_name,
            } => {
                self.transcriber
                    .transcribe(data, &content_type, &file_name)
                    .await?
            }
            Utterance::Text(text) => text,
        };

        let response_text = self.generator.generate(&user_input).await?;

        let emotion = self.classifier.classify(&response_text).await;
        let animation = animation_for(emotion);

        let audio = self.synthesizer.synthesize(&response_text).await?;

        self.interactions.record(InteractionRecord {
            user_id: user_id.to_string(),
            timestamp: Utc::now(),
            user_input,
            response_text: response_text.clone(),
            emotion,
            animation,
        });

        Ok(TurnResult {
            response_text,
            emotion,
            animation,
            audio_output: base64::engine::general_purpose::STANDARD.encode(audio),
        })
    }
}
