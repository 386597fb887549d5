//! OpenAI-compatible chat completions client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// Longest pause between retries
const MAX_BACKOFF_SECS: u64 = 30;

/// Chat completions client with optional retry
pub struct OpenAiClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
    /// Bearer credential
    api_key: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a new client. Fails if no API key is configured.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "API key not configured (set {})",
                    crate::config::API_KEY_ENV
                ))
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if attempt < self.config.max_retries {
                        let delay = backoff_delay(attempt);
                        tracing::warn!(
                            "Chat completion failed (attempt {}/{}): {}; retrying in {:?}",
                            attempt + 1,
                            self.config.max_retries + 1,
                            e,
                            delay
                        );
                        sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::llm("Unknown error")))
    }
}

/// Exponential backoff, capped at `MAX_BACKOFF_SECS`
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt).min(MAX_BACKOFF_SECS))
}

/// Map a non-success HTTP status to an error
pub(crate) fn parse_http_error(status: u16, body: &str) -> Error {
    match status {
        401 | 403 => Error::llm(format!("authentication failed (HTTP {}): {}", status, body)),
        404 => Error::llm(format!("model or endpoint not found: {}", body)),
        408 => Error::Timeout(format!("backend reported timeout: {}", body)),
        429 => Error::llm(format!("rate limited or quota exceeded: {}", body)),
        400 => Error::llm(format!("invalid request: {}", body)),
        _ => Error::llm(format!("HTTP {}: {}", status, body)),
    }
}

/// Pull the generated text out of a chat completions body
pub(crate) fn extract_content(body: &str) -> Result<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| Error::llm(format!("Failed to parse completion response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .ok_or_else(|| Error::llm("Completion response contained no message content"))
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let url = self.endpoint("chat/completions");

        tracing::debug!(
            "Chat completion: model={} temperature={} max_tokens={} json={}",
            self.config.model,
            request.temperature,
            request.max_tokens,
            request.json_output
        );

        self.retry_request(|| {
            let url = url.clone();
            let request = &request;

            async move {
                let body = ChatCompletionRequest {
                    model: &self.config.model,
                    messages: &request.messages,
                    temperature: request.temperature,
                    max_tokens: request.max_tokens,
                    response_format: request
                        .json_output
                        .then_some(ResponseFormat { kind: "json_object" }),
                };

                let response = self
                    .client
                    .post(&url)
                    .bearer_auth(&self.api_key)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| {
                        if e.is_timeout() {
                            Error::Timeout(format!("chat completion: {}", e))
                        } else {
                            Error::llm(format!("Chat completion request failed: {}", e))
                        }
                    })?;

                let status = response.status();
                let text = response
                    .text()
                    .await
                    .map_err(|e| Error::llm(format!("Failed to read completion body: {}", e)))?;

                if !status.is_success() {
                    return Err(parse_http_error(status.as_u16(), &text));
                }

                extract_content(&text)
            }
        })
        .await
    }

    async fn health_check(&self) -> Result<bool> {
        let url = self.endpoint("models");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!("health check: {}", e))
                } else {
                    Error::llm(format!("Health check request failed: {}", e))
                }
            })?;

        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
