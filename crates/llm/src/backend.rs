//! Decision model backend
//!
//! Talks to an OpenAI-compatible chat completions endpoint and parses the
//! model's JSON decision. Transient failures are retried with backoff;
//! a reply that is not valid JSON is downgraded to a plain spoken reply
//! rather than failing the turn.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use frontdesk_config::ModelConfig;
use frontdesk_core::{AgentDecision, DecisionError, DecisionModel, Turn, TurnRole};

const RETRY_BASE_DELAY_MS: u64 = 300;

pub struct OpenAiDecisionModel {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl OpenAiDecisionModel {
    pub fn new(config: &ModelConfig) -> Result<Self, DecisionError> {
        if config.api_key.is_empty() {
            return Err(DecisionError::BackendUnavailable(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| DecisionError::BackendUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.dialog_model.clone(),
            max_retries: config.max_retries,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    async fn request_completion(&self, request: &ChatRequest) -> Result<String, DecisionError> {
        let mut attempt = 0;
        loop {
            match self.send_once(request).await {
                Ok(content) => return Ok(content),
                Err(error) if attempt < self.max_retries => {
                    let delay = Duration::from_millis(RETRY_BASE_DELAY_MS << attempt);
                    warn!(%error, attempt, delay_ms = delay.as_millis() as u64, "dialog request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                },
                Err(error) => return Err(error),
            }
        }
    }

    async fn send_once(&self, request: &ChatRequest) -> Result<String, DecisionError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| DecisionError::BackendUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = body.chars().take(200).collect::<String>();
            return Err(DecisionError::BackendUnavailable(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| DecisionError::Malformed(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| DecisionError::Malformed("empty completion".to_string()))
    }
}

#[async_trait]
impl DecisionModel for OpenAiDecisionModel {
    async fn decide(
        &self,
        system_prompt: &str,
        history: &[Turn],
    ) -> Result<AgentDecision, DecisionError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: build_messages(system_prompt, history),
            temperature: 0.3,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let content = self.request_completion(&request).await?;
        let decision = parse_decision(&content)?;
        debug!(
            has_reply = decision.reply.is_some(),
            tool_calls = decision.tool_calls.len(),
            done = decision.done,
            "decision received"
        );
        Ok(decision)
    }
}

/// Map the conversation into chat messages.
///
/// Tool results ride along as system messages so the model sees them
/// without the endpoint-specific tool-call plumbing.
fn build_messages(system_prompt: &str, history: &[Turn]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage {
        role: "system".to_string(),
        content: system_prompt.to_string(),
    });

    for turn in history {
        let (role, content) = match turn.role {
            TurnRole::User => ("user", turn.content.clone()),
            TurnRole::Assistant => ("assistant", turn.content.clone()),
            TurnRole::System => ("system", turn.content.clone()),
            TurnRole::Tool => {
                let name = turn.tool_name.as_deref().unwrap_or("tool");
                ("system", format!("Result of {}: {}", name, turn.content))
            },
        };
        messages.push(ChatMessage {
            role: role.to_string(),
            content,
        });
    }

    messages
}

/// Parse the model output into a decision.
///
/// Accepts raw JSON or JSON wrapped in a markdown fence. Anything else is
/// treated as a plain spoken reply so one sloppy completion does not kill
/// the turn.
pub fn parse_decision(content: &str) -> Result<AgentDecision, DecisionError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(DecisionError::Malformed("empty decision".to_string()));
    }

    let candidate = strip_fence(trimmed);
    if let Ok(decision) = serde_json::from_str::<AgentDecision>(candidate) {
        if decision.reply.is_none() && decision.tool_calls.is_empty() && !decision.done {
            return Err(DecisionError::Malformed(
                "decision has neither reply nor tool calls".to_string(),
            ));
        }
        return Ok(decision);
    }

    warn!("decision was not valid JSON, using raw text as reply");
    Ok(AgentDecision::reply(trimmed))
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .strip_suffix("```")
        .map(str::trim_end)
        .unwrap_or(text)
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
