//! Outward response contract of the handler.
//!
//! A successful invocation returns an API-Gateway-style object; a failed one
//! returns a bare JSON string. The two shapes are kept exactly as existing
//! callers consume them, so the error kind is not part of the contract.

use crate::error::SuggestError;
use serde::{Deserialize, Serialize};

/// Prefix of every failure message.
pub const FAILURE_PREFIX: &str = "Error occurred: ";

/// Success envelope: `{"statusCode":200,"body":"[...]","isBase64Encoded":false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope {
    pub status_code: u16,
    /// The sanitized JSON array, as text.
    pub body: String,
    pub is_base64_encoded: bool,
}

impl SuccessEnvelope {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
            is_base64_encoded: false,
        }
    }
}

/// Exactly one of the two outward forms per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HandlerResponse {
    Success(SuccessEnvelope),
    /// `"Error occurred: <message>"`.
    Failure(String),
}

impl HandlerResponse {
    pub fn success(body: impl Into<String>) -> Self {
        HandlerResponse::Success(SuccessEnvelope::ok(body))
    }

    pub fn failure(error: &SuggestError) -> Self {
        HandlerResponse::Failure(format!("{FAILURE_PREFIX}{error}"))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, HandlerResponse::Success(_))
    }
}

/// Maximum characters of a logged value before it is cut.
pub const LOG_PREVIEW_CHARS: usize = 500;

/// Shorten `text` for logging, keeping char boundaries intact.
pub fn truncate_for_log(text: &str) -> String {
    let total = text.chars().count();
    if total <= LOG_PREVIEW_CHARS {
        return text.to_string();
    }
    let preview: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
    format!("{preview}… ({total} chars total)")
}
