//! Conversation turns and call records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role in a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// Caller speech (transcribed)
    User,
    /// Agent reply (spoken)
    Assistant,
    /// System instructions
    System,
    /// Tool execution result fed back to the model
    Tool,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
            TurnRole::System => "system",
            TurnRole::Tool => "tool",
        }
    }
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single turn in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Role of the speaker
    pub role: TurnRole,
    /// Content of the turn
    pub content: String,
    /// When the turn occurred
    pub timestamp: DateTime<Utc>,
    /// Name of the tool that produced this turn, for tool turns only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl Turn {
    /// Create a new turn
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            tool_name: None,
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(TurnRole::System, content)
    }

    /// Create a tool-result turn
    pub fn tool(name: impl Into<String>, content: impl Into<String>) -> Self {
        let mut turn = Self::new(TurnRole::Tool, content);
        turn.tool_name = Some(name.into());
        turn
    }

    /// Get word count
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// How a call ended, for the finalized call record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    /// Call ended without any appointment change
    #[default]
    Inquiry,
    /// A new appointment was booked
    Booked,
    /// An existing appointment was cancelled
    Cancelled,
    /// An existing appointment was moved
    Rescheduled,
    /// Caller hung up or went silent before wrapping up
    Abandoned,
}

impl CallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Inquiry => "inquiry",
            CallOutcome::Booked => "booked",
            CallOutcome::Cancelled => "cancelled",
            CallOutcome::Rescheduled => "rescheduled",
            CallOutcome::Abandoned => "abandoned",
        }
    }
}

/// Finalized record of a completed call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub outcome: CallOutcome,
    /// Full turn history, system turns excluded
    pub transcript: Vec<Turn>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_creation() {
        let turn = Turn::user("I'd like a haircut tomorrow");
        assert_eq!(turn.role, TurnRole::User);
        assert!(turn.word_count() > 0);
        assert!(turn.tool_name.is_none());

        let turn = Turn::tool("check_availability", r#"{"slots":[]}"#);
        assert_eq!(turn.role, TurnRole::Tool);
        assert_eq!(turn.tool_name.as_deref(), Some("check_availability"));
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&TurnRole::Assistant).unwrap();
        assert_eq!(json, r#""assistant""#);
    }
}
