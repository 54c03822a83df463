//! Pipeline stages for a menu suggestion.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! decode ──▶ extract ──▶ (prompts) ──▶ completion ──▶ sanitize
//! (base64)   (pdfium)                  (HTTP POST)    ([ … ])
//! ```
//!
//! 1. [`decode`]: base64 `pdf` field → bytes
//! 2. [`extract`]: bytes → menu text; CPU-bound, runs in `spawn_blocking`
//! 3. [`completion`]: system + user instruction → generated text; the only
//!    stage with network I/O
//! 4. [`sanitize`]: generated text → bracket-delimited JSON array

pub mod completion;
pub mod decode;
pub mod extract;
pub mod sanitize;
