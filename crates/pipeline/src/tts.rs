//! Text-to-speech adapter for OpenAI-compatible synthesis endpoints

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use frontdesk_config::ModelConfig;
use frontdesk_core::{SpeechError, SynthesizedAudio, TextToSpeech};

use crate::wav::decode_wav;

/// Synthesis client returning WAV audio for playback
pub struct OpenAiTts {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    voice: String,
}

impl OpenAiTts {
    pub fn new(models: &ModelConfig) -> Result<Self, SpeechError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(models.request_timeout_secs))
            .build()
            .map_err(|e| SpeechError::SynthesisUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            api_base: models.api_base.trim_end_matches('/').to_string(),
            api_key: models.api_key.clone(),
            model: models.tts_model.clone(),
            voice: models.tts_voice.clone(),
        })
    }
}

#[async_trait]
impl TextToSpeech for OpenAiTts {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechError> {
        let response = self
            .client
            .post(format!("{}/audio/speech", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "voice": self.voice,
                "input": text,
                "response_format": "wav",
            }))
            .send()
            .await
            .map_err(|e| SpeechError::SynthesisUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::SynthesisUnavailable(format!(
                "status {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::SynthesisUnavailable(e.to_string()))?;

        let (samples, sample_rate) =
            decode_wav(&bytes).map_err(|e| SpeechError::InvalidAudio(e.to_string()))?;

        tracing::debug!(
            model = %self.model,
            voice = %self.voice,
            duration_ms = (samples.len() as f64 / sample_rate as f64 * 1000.0) as u64,
            "reply synthesized"
        );

        Ok(SynthesizedAudio {
            samples,
            sample_rate,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
