//! Agent decision contract
//!
//! One decision per model round: optionally a spoken reply, optionally a
//! batch of tool calls, and a flag marking the conversation complete. The
//! orchestrator enforces the reply/tool-call precedence; these types only
//! carry the payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single requested tool invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRequest {
    /// Registered tool name
    pub name: String,
    /// Arguments as a JSON object
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCallRequest {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// One round of model output
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AgentDecision {
    /// Text to speak to the caller, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// Tool calls to execute before the next round
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
    /// True when the caller's business is concluded
    #[serde(default)]
    pub done: bool,
}

impl AgentDecision {
    /// A reply-only decision
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
            tool_calls: Vec::new(),
            done: false,
        }
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Result of executing one tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Tool that was invoked
    pub name: String,
    /// Tool output, or a structured error payload when `is_error`
    pub result: Value,
    /// True when the tool failed and `result` describes the failure
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn success(name: impl Into<String>, result: Value) -> Self {
        Self {
            name: name.into(),
            result,
            is_error: false,
        }
    }

    pub fn failure(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result: serde_json::json!({ "error": message.into() }),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decision_deserializes_with_defaults() {
        let decision: AgentDecision =
            serde_json::from_str(r#"{"reply": "Hello! How can I help?"}"#).unwrap();
        assert_eq!(decision.reply.as_deref(), Some("Hello! How can I help?"));
        assert!(!decision.has_tool_calls());
        assert!(!decision.done);
    }

    #[test]
    fn test_decision_with_tool_calls() {
        let decision: AgentDecision = serde_json::from_str(
            r#"{"tool_calls": [{"name": "get_services", "arguments": {}}], "done": false}"#,
        )
        .unwrap();
        assert!(decision.has_tool_calls());
        assert_eq!(decision.tool_calls[0].name, "get_services");
    }

    #[test]
    fn test_outcome_failure_payload() {
        let outcome = ToolOutcome::failure("book_appointment", "slot taken");
        assert!(outcome.is_error);
        assert_eq!(outcome.result, json!({ "error": "slot taken" }));
    }
}
