//! Dialog model integration
//!
//! System prompt construction and the OpenAI-compatible backend that turns
//! a conversation into the next agent decision.

pub mod backend;
pub mod prompt;

pub use backend::{parse_decision, OpenAiDecisionModel};
pub use prompt::build_system_prompt;
