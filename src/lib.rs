//! # fitmymacros-pdfreader
//!
//! Suggest restaurant dishes that match a set of nutritional targets, given
//! the restaurant's menu as a PDF.
//!
//! The crate is the body of an AWS Lambda function: it reads the menu text
//! out of the PDF, asks a chat-completion model for the five best-matching
//! options, and returns the model's JSON array to the caller.
//!
//! ## Pipeline Overview
//!
//! ```text
//! payload
//!  │
//!  ├─ 1. Request   typed parse of the `body` JSON string
//!  ├─ 2. Decode    base64 → PDF bytes
//!  ├─ 3. Extract   pdfium text extraction (spawn_blocking)
//!  ├─ 4. Prompt    fixed system instruction + per-request user instruction
//!  ├─ 5. Complete  one POST to the chat-completions endpoint
//!  ├─ 6. Sanitize  keep the text from the first `[` to the last `]`
//!  └─ 7. Envelope  {statusCode, body, isBase64Encoded} or "Error occurred: …"
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fitmymacros_pdfreader::{CompletionConfig, MenuSuggester, PdfiumExtractor};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CompletionConfig::builder()
//!         .model("gpt-4o-mini")
//!         .api_key(std::env::var("OPENAI_API_KEY")?)
//!         .build()?;
//!     let suggester = MenuSuggester::with_openai(Arc::new(PdfiumExtractor::bind()?), config);
//!
//!     let body = serde_json::json!({
//!         "pdf": "JVBERi0xLjcK...",
//!         "mealTime": "lunch",
//!         "protein": "40", "carbs": "50", "fat": "15",
//!         "targetEnergy": "600", "energyUnit": "kcal", "weightUnit": "g"
//!     });
//!     let response = suggester
//!         .handle(serde_json::json!({ "body": body.to_string() }))
//!         .await;
//!     println!("{}", serde_json::to_string_pretty(&response)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `pdfreader` local driver (clap + anyhow + indicatif) |
//! | `lambda` | off     | Enables `pdfreader-lambda` and `parameters::SsmParameterStore` |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod handler;
pub mod output;
pub mod parameters;
pub mod pipeline;
pub mod prompts;
pub mod request;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CompletionConfig, CompletionConfigBuilder, ParameterNames};
pub use error::{ConfigError, ErrorKind, SuggestError};
pub use handler::MenuSuggester;
pub use output::{HandlerResponse, SuccessEnvelope};
pub use parameters::{InMemoryParameterStore, ParameterStore};
pub use pipeline::completion::{CompletionClient, OpenAiClient};
pub use pipeline::extract::{PdfiumExtractor, TextExtractor};
pub use prompts::Prompt;
pub use request::{NutritionRequest, NutritionTargets};
