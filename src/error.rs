//! Error types for the fitmymacros-pdfreader library.
//!
//! Two distinct error types reflect two distinct phases:
//!
//! * [`ConfigError`]: **Startup**. The process cannot serve anything
//!   (parameter store unreachable, credential missing, pdfium not bindable).
//!   The Lambda binary exits before accepting its first event.
//!
//! * [`SuggestError`]: **Per request**. One invocation failed. The handler
//!   converts it into the failure envelope and the process keeps serving.

use thiserror::Error;

/// Message carried by [`SuggestError::MalformedGeneratedOutput`].
pub const MALFORMED_OUTPUT_MESSAGE: &str = "Invalid JSON string format generated by OpenAI";

/// All per-request failures raised by the suggestion pipeline.
///
/// Every variant is caught by [`crate::handler::MenuSuggester::handle`] and
/// rendered as `"Error occurred: <message>"`.
#[derive(Debug, Error)]
pub enum SuggestError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The invocation payload has no usable `body`.
    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    /// One or more request fields are missing or not integers.
    ///
    /// `fields` lists every offending field, not just the first.
    #[error("Invalid request fields: {}", fields.join(", "))]
    InputField { fields: Vec<String> },

    /// The `pdf` field is not valid base64.
    #[error("Failed to decode PDF payload: {0}")]
    Decode(String),

    // ── Document errors ───────────────────────────────────────────────────
    /// The decoded bytes are not a readable PDF.
    #[error("Failed to read PDF document: {0}")]
    DocumentParse(String),

    // ── Completion errors ─────────────────────────────────────────────────
    /// The completion API could not be reached or answered with a non-2xx status.
    #[error("Error occurred while invoking the completion API: {}", describe_upstream(*status, reason))]
    UpstreamRequestFailed { status: Option<u16>, reason: String },

    /// The completion API answered 2xx but without a usable first choice.
    #[error("Malformed completion response: {0}")]
    MalformedUpstreamResponse(String),

    /// The generated text contains no `[ ... ]` array.
    #[error("{}", MALFORMED_OUTPUT_MESSAGE)]
    MalformedGeneratedOutput,

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a panicked blocking task).
    #[error("Internal error: {0}")]
    Internal(String),
}

fn describe_upstream(status: Option<u16>, reason: &str) -> String {
    match status {
        Some(code) => format!("HTTP {code}"),
        None => reason.to_string(),
    }
}

/// Coarse classification of a [`SuggestError`], used for structured logs.
///
/// The outward envelope deliberately carries only the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Decode,
    DocumentParse,
    UpstreamRequest,
    UpstreamResponse,
    GeneratedOutput,
    Internal,
}

impl SuggestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SuggestError::InvalidPayload(_) | SuggestError::InputField { .. } => ErrorKind::Input,
            SuggestError::Decode(_) => ErrorKind::Decode,
            SuggestError::DocumentParse(_) => ErrorKind::DocumentParse,
            SuggestError::UpstreamRequestFailed { .. } => ErrorKind::UpstreamRequest,
            SuggestError::MalformedUpstreamResponse(_) => ErrorKind::UpstreamResponse,
            SuggestError::MalformedGeneratedOutput => ErrorKind::GeneratedOutput,
            SuggestError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Startup failures: configuration retrieval and PDF engine binding.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The parameter store could not return a value.
    #[error("Parameter '{name}' is unavailable: {reason}")]
    ParameterUnavailable { name: String, reason: String },

    /// The parameter exists but its value has the wrong shape.
    #[error("Parameter '{name}' has an invalid value '{value}': expected {expected}")]
    InvalidParameter {
        name: String,
        value: String,
        expected: &'static str,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy."
    )]
    PdfEngine(String),
}
