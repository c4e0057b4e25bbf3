//! Tool registry and dispatch
//!
//! Holds the tools the decision model may call and executes requests with
//! argument validation and a per-tool timeout. Dispatch never propagates an
//! error: every failure mode is folded into a `ToolOutcome` so one bad call
//! cannot take down the conversation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use frontdesk_core::{ToolCallRequest, ToolOutcome};

use crate::error::ToolError;
use crate::schema::Tool;

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            warn!(tool = %name, "replacing previously registered tool");
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Tool definitions in the shape the system prompt embeds
    pub fn definitions(&self) -> Vec<serde_json::Value> {
        let mut tools: Vec<&Arc<dyn Tool>> = self.tools.values().collect();
        tools.sort_by_key(|t| t.name());
        tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.schema().to_json(),
                })
            })
            .collect()
    }

    /// Execute one requested call, bounded by the tool's timeout
    pub async fn execute(&self, request: &ToolCallRequest) -> ToolOutcome {
        let Some(tool) = self.tools.get(&request.name) else {
            warn!(tool = %request.name, "unknown tool requested");
            return ToolOutcome::failure(
                &request.name,
                ToolError::UnknownTool(request.name.clone()).to_string(),
            );
        };

        if let Err(error) = tool.validate(&request.arguments) {
            warn!(tool = %request.name, %error, "tool arguments rejected");
            return ToolOutcome::failure(&request.name, error.to_string());
        }

        let timeout = Duration::from_secs(tool.timeout_secs());
        let result = tokio::time::timeout(timeout, tool.execute(request.arguments.clone())).await;

        match result {
            Ok(Ok(value)) => {
                debug!(tool = %request.name, "tool call succeeded");
                ToolOutcome::success(&request.name, value)
            },
            Ok(Err(error)) => {
                warn!(tool = %request.name, %error, "tool call failed");
                ToolOutcome::failure(&request.name, error.to_string())
            },
            Err(_) => {
                warn!(tool = %request.name, timeout_secs = timeout.as_secs(), "tool call timed out");
                ToolOutcome::failure(
                    &request.name,
                    ToolError::timeout(&request.name, timeout.as_secs()).to_string(),
                )
            },
        }
    }
}
