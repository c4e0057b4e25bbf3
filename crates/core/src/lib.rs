//! Core types and collaborator traits for the frontdesk voice agent
//!
//! This crate provides the vocabulary shared across all other crates:
//! - Audio frame and utterance types
//! - Conversation turns and call records
//! - The agent decision contract
//! - Traits for pluggable collaborators (STT, TTS, decision model)
//! - Error types for those collaborators

pub mod audio;
pub mod conversation;
pub mod decision;
pub mod error;
pub mod traits;

pub use audio::{AudioFrame, Utterance};
pub use conversation::{CallOutcome, CallRecord, Turn, TurnRole};
pub use decision::{AgentDecision, ToolCallRequest, ToolOutcome};
pub use error::{DecisionError, SpeechError};
pub use traits::{DecisionModel, SpeechToText, SynthesizedAudio, TextToSpeech, Transcript};
