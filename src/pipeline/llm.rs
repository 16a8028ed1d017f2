//! Completion API interaction: one synchronous chat call per quiz.
//!
//! This module is intentionally thin — all prompt engineering lives in
//! [`crate::prompts`] so the template can change without touching transport
//! or error mapping here. The request/response types mirror the
//! OpenAI-compatible chat-completions wire shape; only the fields this crate
//! reads are modelled.
//!
//! No retries: a failed call is classified (rate limit, auth, other) and
//! surfaced. The classification records what *would* be retryable for logs
//! and callers.

use crate::error::QuizGenError;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
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
    content: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct CompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl CompletionClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user-role prompt and return the first choice's content.
    pub async fn complete(&self, prompt: &str) -> Result<String, QuizGenError> {
        let start = Instant::now();
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };
        debug!(
            "Requesting completion: model={}, temperature={}, prompt={} chars",
            self.model,
            self.temperature,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| QuizGenError::LlmApi {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            warn!("Completion API rate limited (retry-after: {retry_after_secs:?})");
            return Err(QuizGenError::RateLimited {
                model: self.model.clone(),
                retry_after_secs,
            });
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(QuizGenError::AuthFailed {
                detail: format!("HTTP {status}"),
            });
        }
        if !status.is_success() {
            return Err(QuizGenError::LlmApi {
                message: format!("HTTP {status}"),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| QuizGenError::LlmApi {
            message: format!("unreadable response: {e}"),
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| QuizGenError::EmptyCompletion {
                model: self.model.clone(),
            })?;
        if content.trim().is_empty() {
            return Err(QuizGenError::EmptyCompletion {
                model: self.model.clone(),
            });
        }

        debug!(
            "Completion received: {} chars in {:?}",
            content.len(),
            start.elapsed()
        );
        Ok(content)
    }
}
