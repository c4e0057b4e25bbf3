//! Per-call conversation state
//!
//! Accumulates the turn history and tracks the call outcome as tools
//! succeed. Finalizing produces the call record.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use frontdesk_core::{CallOutcome, CallRecord, ToolOutcome, Turn, TurnRole};

pub struct ConversationState {
    id: Uuid,
    started_at: DateTime<Utc>,
    turns: Vec<Turn>,
    outcome: CallOutcome,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            turns: Vec::new(),
            outcome: CallOutcome::Inquiry,
        }
    }

    pub fn call_id(&self) -> Uuid {
        self.id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn outcome(&self) -> CallOutcome {
        self.outcome
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::assistant(text));
    }

    /// Record a tool result as a turn and fold it into the call outcome
    pub fn push_tool_outcome(&mut self, outcome: &ToolOutcome) {
        self.turns
            .push(Turn::tool(&outcome.name, outcome.result.to_string()));

        if outcome.is_error || outcome.result.get("success") != Some(&serde_json::Value::Bool(true))
        {
            return;
        }
        match outcome.name.as_str() {
            "book_appointment" => self.outcome = CallOutcome::Booked,
            "cancel_appointment" => self.outcome = CallOutcome::Cancelled,
            "reschedule_appointment" => self.outcome = CallOutcome::Rescheduled,
            _ => {},
        }
    }

    pub fn mark_abandoned(&mut self) {
        self.outcome = CallOutcome::Abandoned;
    }

    /// Close out the call; system turns are dropped from the transcript
    pub fn finish(self) -> CallRecord {
        CallRecord {
            id: self.id,
            started_at: self.started_at,
            ended_at: Utc::now(),
            outcome: self.outcome,
            transcript: self
                .turns
                .into_iter()
                .filter(|t| t.role != TurnRole::System)
                .collect(),
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}
