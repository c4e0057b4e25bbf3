//! Speech-to-text adapter for OpenAI-compatible transcription endpoints

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use frontdesk_config::ModelConfig;
use frontdesk_core::{SpeechError, SpeechToText, Transcript, Utterance};

use crate::wav::encode_wav_pcm16;

/// Whisper-style transcription client
pub struct WhisperStt {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

impl WhisperStt {
    pub fn new(models: &ModelConfig) -> Result<Self, SpeechError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(models.request_timeout_secs))
            .build()
            .map_err(|e| SpeechError::TranscriptionUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            api_base: models.api_base.trim_end_matches('/').to_string(),
            api_key: models.api_key.clone(),
            model: models.stt_model.clone(),
        })
    }
}

#[async_trait]
impl SpeechToText for WhisperStt {
    async fn transcribe(&self, utterance: &Utterance) -> Result<Transcript, SpeechError> {
        let wav = encode_wav_pcm16(&utterance.samples, utterance.sample_rate)
            .map_err(|e| SpeechError::InvalidAudio(e.to_string()))?;

        let part = reqwest::multipart::Part::bytes(wav)
            .file_name("utterance.wav")
            .mime_str("audio/wav")
            .map_err(|e| SpeechError::InvalidAudio(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.api_base))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechError::TranscriptionUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::TranscriptionUnavailable(format!(
                "status {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let payload: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::TranscriptionUnavailable(e.to_string()))?;

        tracing::debug!(
            model = %self.model,
            chars = payload.text.len(),
            "utterance transcribed"
        );

        Ok(Transcript {
            text: payload.text.trim().to_string(),
            language: payload.language,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
