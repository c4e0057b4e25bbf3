//! Decision loop
//!
//! One caller turn drives a bounded number of decision rounds: the model
//! may request tool calls, see their results, and decide again until it
//! produces a spoken reply. A decision carrying both tool calls and a
//! reply executes the tool calls and drops the reply, so the caller only
//! hears text grounded in tool results. If the rounds run out without a
//! reply, a fixed clarification line goes out instead.

use std::sync::Arc;

use tracing::{debug, warn};

use frontdesk_core::DecisionModel;
use frontdesk_tools::ToolRegistry;

use crate::error::AgentError;
use crate::state::ConversationState;

const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having a little trouble with that. Could you tell me again what you need?";

/// Spoken when the model signals `done` without any reply text
const WRAP_UP_REPLY: &str = "Alright, thanks for calling. Goodbye!";

/// The spoken reply produced by one caller turn
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub text: String,
    /// True when the call should wrap up after this reply
    pub done: bool,
}

pub struct Orchestrator {
    model: Arc<dyn DecisionModel>,
    registry: Arc<ToolRegistry>,
    max_rounds: u32,
}

impl Orchestrator {
    pub fn new(model: Arc<dyn DecisionModel>, registry: Arc<ToolRegistry>, max_rounds: u32) -> Self {
        Self {
            model,
            registry,
            max_rounds: max_rounds.max(1),
        }
    }

    /// Run decision rounds for the latest caller turn until a reply emerges
    pub async fn run_turn(
        &self,
        system_prompt: &str,
        state: &mut ConversationState,
    ) -> Result<AgentReply, AgentError> {
        for round in 0..self.max_rounds {
            let decision = self.model.decide(system_prompt, state.turns()).await?;

            if decision.has_tool_calls() {
                if let Some(dropped) = &decision.reply {
                    warn!(
                        round,
                        reply = %dropped,
                        "decision carried both reply and tool calls, dropping the reply"
                    );
                }
                for request in &decision.tool_calls {
                    let outcome = self.registry.execute(request).await;
                    debug!(round, tool = %outcome.name, is_error = outcome.is_error, "tool executed");
                    state.push_tool_outcome(&outcome);
                }
                continue;
            }

            if let Some(text) = decision.reply {
                state.push_assistant(&text);
                return Ok(AgentReply {
                    text,
                    done: decision.done,
                });
            }

            // Neither reply nor tool calls; done-only is treated as a wrap-up
            if decision.done {
                state.push_assistant(WRAP_UP_REPLY);
                return Ok(AgentReply {
                    text: WRAP_UP_REPLY.to_string(),
                    done: true,
                });
            }
        }

        warn!(max_rounds = self.max_rounds, "decision rounds exhausted without a reply");
        state.push_assistant(FALLBACK_REPLY);
        Ok(AgentReply {
            text: FALLBACK_REPLY.to_string(),
            done: false,
        })
    }
}
