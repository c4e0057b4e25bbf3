//! Pipeline error types

use std::time::Duration;
use thiserror::Error;

use frontdesk_core::SpeechError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Caller never crossed the start threshold within the wait window
    #[error("no speech detected within {waited:?}")]
    NoSpeechDetected { waited: Duration },

    /// The audio producer hung up its end of the frame channel
    #[error("audio stream closed")]
    AudioStreamClosed,

    /// Capture was cancelled externally
    #[error("capture cancelled")]
    Cancelled,

    /// STT or TTS collaborator failure
    #[error(transparent)]
    Speech(#[from] SpeechError),

    /// WAV encode or decode failure
    #[error("wav processing failed: {0}")]
    Wav(String),
}

impl From<hound::Error> for PipelineError {
    fn from(err: hound::Error) -> Self {
        PipelineError::Wav(err.to_string())
    }
}
