//! Audio pipeline: VAD capture and speech adapters
//!
//! The capture side turns a live frame stream into finalized utterances via
//! per-call energy calibration. The adapter side talks to OpenAI-compatible
//! transcription and synthesis endpoints.

pub mod capture;
pub mod error;
pub mod stt;
pub mod tts;
pub mod vad;
pub mod wav;

pub use capture::SpeechCapture;
pub use error::PipelineError;
pub use stt::WhisperStt;
pub use tts::OpenAiTts;
pub use vad::{CalibrationProfile, Calibrator, CaptureProgress, UtteranceRecorder};
