//! Request handler: the single entry point for one invocation.
//!
//! [`MenuSuggester`] composes the pipeline stages in order and is the only
//! place that knows about the outward envelope. Stages below it return
//! `Result`; every error is turned into the failure envelope here.
//!
//! The suggester holds no mutable state. Share one instance behind an `Arc`
//! across concurrent invocations.

use crate::config::CompletionConfig;
use crate::error::SuggestError;
use crate::output::{truncate_for_log, HandlerResponse};
use crate::pipeline::completion::{CompletionClient, OpenAiClient};
use crate::pipeline::extract::TextExtractor;
use crate::pipeline::{decode, sanitize};
use crate::prompts::Prompt;
use crate::request::NutritionRequest;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Turns a menu PDF plus nutrition targets into suggested options.
#[derive(Clone)]
pub struct MenuSuggester {
    extractor: Arc<dyn TextExtractor>,
    completion: Arc<dyn CompletionClient>,
}

impl MenuSuggester {
    pub fn new(extractor: Arc<dyn TextExtractor>, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            extractor,
            completion,
        }
    }

    /// Build a suggester that calls an OpenAI-compatible endpoint.
    pub fn with_openai(extractor: Arc<dyn TextExtractor>, config: CompletionConfig) -> Self {
        Self::new(extractor, Arc::new(OpenAiClient::new(config)))
    }

    /// Handle one invocation payload. Never fails: errors become the
    /// failure envelope.
    pub async fn handle(&self, payload: Value) -> HandlerResponse {
        let start = Instant::now();
        info!("input: {}", truncate_for_log(&redact_payload(&payload).to_string()));

        match self.suggest(&payload).await {
            Ok(body) => {
                info!(
                    "Suggestions ready in {}ms: {}",
                    start.elapsed().as_millis(),
                    truncate_for_log(&body)
                );
                HandlerResponse::success(body)
            }
            Err(e) => {
                warn!(kind = ?e.kind(), "Request failed: {}", e);
                HandlerResponse::failure(&e)
            }
        }
    }

    /// Run the pipeline and return the sanitized JSON array text.
    pub async fn suggest(&self, payload: &Value) -> Result<String, SuggestError> {
        let request = NutritionRequest::from_payload(payload)?;
        let menu_text = self.extract_menu_text(&request.pdf).await?;

        let prompt = Prompt::for_request(&menu_text, &request.targets);
        info!("prompt: {}", truncate_for_log(&prompt.user));

        let generated = self.completion.complete(&prompt).await?;
        let array = sanitize::extract_json_array(&generated)?;
        Ok(array.to_string())
    }

    /// Decode the base64 PDF and extract its text on the blocking pool.
    pub async fn extract_menu_text(&self, encoded_pdf: &str) -> Result<String, SuggestError> {
        let bytes = decode::decode_document(encoded_pdf)?;
        let extractor = Arc::clone(&self.extractor);

        let text = tokio::task::spawn_blocking(move || extractor.extract_text(&bytes))
            .await
            .map_err(|e| SuggestError::Internal(format!("Extraction task panicked: {}", e)))??;

        debug!("Extracted {} chars of menu text", text.chars().count());
        Ok(text)
    }
}

/// Copy of the payload with the base64 PDF replaced by its length.
fn redact_payload(payload: &Value) -> Value {
    let mut redacted = payload.clone();
    if let Some(body) = redacted.get_mut("body") {
        let decoded = match body {
            Value::String(raw) => serde_json::from_str::<Value>(raw).ok(),
            _ => None,
        };
        match decoded {
            Some(mut parsed) => {
                redact_pdf_field(&mut parsed);
                *body = parsed;
            }
            None => redact_pdf_field(body),
        }
    }
    redacted
}

fn redact_pdf_field(body: &mut Value) {
    if let Some(pdf) = body.get_mut("pdf") {
        if let Some(len) = pdf.as_str().map(str::len) {
            *pdf = Value::String(format!("<{len} base64 chars>"));
        }
    }
}
