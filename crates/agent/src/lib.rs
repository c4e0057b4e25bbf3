//! Call session and decision loop
//!
//! Ties the audio pipeline, the dialog model, and the appointment tools
//! into one phone call: bounded decision rounds per caller turn, spoken
//! recovery for per-turn failures, and a finalized call record at the end.

pub mod error;
pub mod orchestrator;
pub mod session;
pub mod state;

pub use error::AgentError;
pub use orchestrator::{AgentReply, Orchestrator};
pub use session::CallSession;
pub use state::ConversationState;
