//! Tool error types

use thiserror::Error;

/// Errors surfaced while resolving or executing a tool call.
///
/// These are all recoverable at the call level: the registry folds them
/// into an error outcome that goes back to the decision model.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool registered under the requested name
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments failed schema validation or refer to unknown entities
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Referenced appointment or customer does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The requested change collides with existing bookings
    #[error("conflict: {0}")]
    Conflict(String),

    /// A backing service the tool relies on is unreachable
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Tool execution exceeded its timeout
    #[error("tool '{name}' timed out after {seconds}s")]
    Timeout { name: String, seconds: u64 },
}

impl ToolError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ToolError::InvalidArguments(message.into())
    }

    pub fn timeout(name: impl Into<String>, seconds: u64) -> Self {
        ToolError::Timeout {
            name: name.into(),
            seconds,
        }
    }
}
