//! Text extraction: PDF bytes → plain menu text via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! pdfium is a C++ library behind an FFI boundary; parsing a document is
//! CPU-bound and must not run on a Tokio worker thread. The handler moves
//! the bytes onto the blocking pool and calls [`TextExtractor::extract_text`]
//! there.
//!
//! ## Resource scope
//!
//! The parsed document lives only inside [`PdfiumExtractor::extract_text`]
//! and is dropped (closed) on every exit path, including a failure on a
//! later page after earlier pages were read.

use crate::error::{ConfigError, SuggestError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Header marker of every PDF.
const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// How far into the file the header may start (BOMs, stray newlines).
const HEADER_SEARCH_WINDOW: usize = 1024;

/// The "bytes → text" capability used by the handler.
pub trait TextExtractor: Send + Sync {
    /// Extract the document's text, pages in natural order.
    ///
    /// Returns an empty string for a well-formed document without text.
    fn extract_text(&self, pdf: &[u8]) -> Result<String, SuggestError>;
}

/// Extracts text with pdfium.
///
/// The library is located (and downloaded if needed) once by
/// [`PdfiumExtractor::bind`]; each extraction binds to that resolved path.
#[derive(Debug, Clone)]
pub struct PdfiumExtractor {
    library_path: PathBuf,
}

impl PdfiumExtractor {
    /// Resolve the pdfium library via `pdfium-auto` and check that it binds.
    ///
    /// Honours `PDFIUM_LIB_PATH` (e.g. a Lambda layer at `/opt/lib`) and
    /// `PDFIUM_AUTO_CACHE_DIR` (must be writable, e.g. `/tmp` on Lambda).
    pub fn bind() -> Result<Self, ConfigError> {
        let library_path = pdfium_auto::ensure_pdfium_library(None)
            .map_err(|e| ConfigError::PdfEngine(e.to_string()))?;
        Self::from_library_path(library_path)
    }

    /// Use an explicit pdfium library, skipping the download/cache layer.
    pub fn from_library_path(library_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let library_path = library_path.into();
        pdfium_auto::bind_pdfium_from_path(&library_path)
            .map_err(|e| ConfigError::PdfEngine(e.to_string()))?;
        info!("PDF engine bound: {}", library_path.display());
        Ok(Self { library_path })
    }

    pub fn library_path(&self) -> &Path {
        &self.library_path
    }
}

impl TextExtractor for PdfiumExtractor {
    fn extract_text(&self, pdf: &[u8]) -> Result<String, SuggestError> {
        check_magic(pdf)?;

        let pdfium = pdfium_auto::bind_pdfium_from_path(&self.library_path)
            .map_err(|e| SuggestError::Internal(format!("PDF engine unavailable: {e}")))?;

        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| SuggestError::DocumentParse(format!("{:?}", e)))?;

        let pages = document.pages();
        debug!("PDF loaded: {} pages", pages.len());

        let mut page_texts = Vec::with_capacity(pages.len() as usize);
        for (idx, page) in pages.iter().enumerate() {
            let text = page.text().map_err(|e| {
                SuggestError::DocumentParse(format!("page {}: {:?}", idx + 1, e))
            })?;
            page_texts.push(text.all());
        }

        Ok(normalise_text(&page_texts.join("\n")))
    }
}

fn check_magic(pdf: &[u8]) -> Result<(), SuggestError> {
    let window = &pdf[..pdf.len().min(HEADER_SEARCH_WINDOW)];
    if window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) {
        return Ok(());
    }
    let head: Vec<u8> = pdf.iter().take(PDF_MAGIC.len()).copied().collect();
    Err(SuggestError::DocumentParse(format!(
        "not a PDF document (first bytes: {:?})",
        head
    )))
}

/// CRLF/CR → LF, and no trailing whitespace after the last page.
fn normalise_text(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .trim_end()
        .to_string()
}
