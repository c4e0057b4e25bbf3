//! Shared error types for collaborator traits

use thiserror::Error;

/// Errors from speech collaborators (STT and TTS)
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Transcription backend unreachable or returned a failure
    #[error("transcription unavailable: {0}")]
    TranscriptionUnavailable(String),

    /// Synthesis backend unreachable or returned a failure
    #[error("speech synthesis unavailable: {0}")]
    SynthesisUnavailable(String),

    /// Audio payload could not be encoded or decoded
    #[error("invalid audio: {0}")]
    InvalidAudio(String),
}

/// Errors from the decision collaborator
#[derive(Debug, Error)]
pub enum DecisionError {
    /// Model backend unreachable after retries
    #[error("decision backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Backend responded but the payload was unusable
    #[error("malformed decision: {0}")]
    Malformed(String),
}
