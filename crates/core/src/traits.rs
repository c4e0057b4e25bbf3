//! Collaborator traits
//!
//! STT, TTS, and the decision model are external services behind these
//! traits so the call pipeline can be exercised with mocks.

use async_trait::async_trait;

use crate::audio::Utterance;
use crate::conversation::Turn;
use crate::decision::AgentDecision;
use crate::error::{DecisionError, SpeechError};

/// Transcription result
#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    /// Detected language code, when the backend reports one
    pub language: Option<String>,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Synthesized speech ready for playback
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// Mono f32 samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl SynthesizedAudio {
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Speech-to-text collaborator
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe one finalized utterance
    async fn transcribe(&self, utterance: &Utterance) -> Result<Transcript, SpeechError>;

    /// Model identifier for logging
    fn model_name(&self) -> &str;
}

/// Text-to-speech collaborator
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize one reply
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechError>;

    /// Model identifier for logging
    fn model_name(&self) -> &str;
}

/// Decision collaborator: maps the conversation so far to one decision round
#[async_trait]
pub trait DecisionModel: Send + Sync {
    /// Produce the next decision given the system prompt and full history
    async fn decide(
        &self,
        system_prompt: &str,
        history: &[Turn],
    ) -> Result<AgentDecision, DecisionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockStt;

    #[async_trait]
    impl SpeechToText for MockStt {
        async fn transcribe(&self, _utterance: &Utterance) -> Result<Transcript, SpeechError> {
            Ok(Transcript::new("hello"))
        }

        fn model_name(&self) -> &str {
            "mock-stt"
        }
    }

    #[tokio::test]
    async fn test_mock_stt() {
        let stt = MockStt;
        let utterance = Utterance {
            samples: vec![0.0; 160],
            sample_rate: 16000,
            truncated: false,
        };
        let transcript = stt.transcribe(&utterance).await.unwrap();
        assert_eq!(transcript.text, "hello");
        assert!(!transcript.is_empty());
    }
}
