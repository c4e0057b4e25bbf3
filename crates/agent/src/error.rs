//! Agent error types

use thiserror::Error;

use frontdesk_core::{DecisionError, SpeechError};
use frontdesk_pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("decision model failed: {0}")]
    Decision(#[from] DecisionError),

    #[error("speech processing failed: {0}")]
    Speech(#[from] SpeechError),

    #[error("audio pipeline failed: {0}")]
    Pipeline(#[from] PipelineError),
}
