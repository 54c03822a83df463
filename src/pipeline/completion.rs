//! Completion call: send the prompt to a chat-completions endpoint.
//!
//! The request always carries exactly two messages, system first and user
//! second, plus the configured model, temperature and token budget. Only
//! `choices[0].message.content` of the reply is used.
//!
//! There is no retry and no timeout beyond reqwest's defaults: one attempt
//! per invocation, bounded by the Lambda deadline.

use crate::config::CompletionConfig;
use crate::error::SuggestError;
use crate::prompts::Prompt;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// Anything that can turn a [`Prompt`] into generated text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Return the text of the first generated choice.
    async fn complete(&self, prompt: &Prompt) -> Result<String, SuggestError>;
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatRequest<'a> {
    pub fn new(prompt: &'a Prompt, config: &'a CompletionConfig) -> Self {
        Self {
            model: &config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Chat-completions response body; everything but the choices is ignored.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
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

/// OpenAI-compatible client over reqwest.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: CompletionConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Use a caller-supplied `reqwest::Client` (proxies, custom TLS roots).
    pub fn with_http_client(config: CompletionConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, SuggestError> {
        let start = Instant::now();
        let request = ChatRequest::new(prompt, &self.config);

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SuggestError::UpstreamRequestFailed {
                status: None,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            // The body is only reported; nothing from it reaches the caller.
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                "Completion API returned an error: {}",
                body
            );
            return Err(SuggestError::UpstreamRequestFailed {
                status: Some(status.as_u16()),
                reason: body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SuggestError::MalformedUpstreamResponse(e.to_string()))?;

        debug!(
            "Completion received: {} choices in {:?}",
            parsed.choices.len(),
            start.elapsed()
        );

        first_choice_content(parsed)
    }
}

fn first_choice_content(response: ChatResponse) -> Result<String, SuggestError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| SuggestError::MalformedUpstreamResponse("no choices returned".into()))?;

    choice.message.content.ok_or_else(|| {
        SuggestError::MalformedUpstreamResponse("first choice has no content".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> CompletionConfig {
        CompletionConfig::builder()
            .model("gpt-4o-mini")
            .api_key("sk-test")
            .temperature(0.5)
            .max_tokens(300)
            .build()
            .unwrap()
    }

    #[test]
    fn request_has_system_then_user() {
        let prompt = Prompt {
            system: "sys".into(),
            user: "usr".into(),
        };
        let config = config();
        let body = serde_json::to_value(ChatRequest::new(&prompt, &config)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "usr" }
                ],
                "max_tokens": 300,
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn takes_first_choice() {
        let response: ChatResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "[1]" } },
                { "index": 1, "message": { "role": "assistant", "content": "[2]" } }
            ]
        }))
        .unwrap();
        assert_eq!(first_choice_content(response).unwrap(), "[1]");
    }

    #[test]
    fn empty_choices_are_malformed() {
        let response: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        let err = first_choice_content(response).unwrap_err();
        assert!(matches!(err, SuggestError::MalformedUpstreamResponse(_)));

        let response: ChatResponse = serde_json::from_value(json!({})).unwrap();
        assert!(first_choice_content(response).is_err());
    }

    #[test]
    fn null_content_is_malformed() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        }))
        .unwrap();
        let err = first_choice_content(response).unwrap_err();
        assert!(matches!(err, SuggestError::MalformedUpstreamResponse(_)));
    }
}
