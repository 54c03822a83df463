//! pdfium text extraction against small generated PDFs.
//!
//! These tests need a pdfium library on disk. They never trigger a download:
//! when neither `PDFIUM_LIB_PATH` nor the pdfium-auto cache provides one,
//! each test prints SKIP and returns.
//!
//! Run with:
//!   PDFIUM_LIB_PATH=/path/to/libpdfium.so cargo test --test extract -- --nocapture

use base64::{engine::general_purpose::STANDARD, Engine as _};
use fitmymacros_pdfreader::pipeline::decode::decode_document;
use fitmymacros_pdfreader::{
    MenuSuggester, NutritionTargets, PdfiumExtractor, Prompt, SuggestError, TextExtractor,
};
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless a pdfium library is available without downloading.
macro_rules! skip_unless_pdfium {
    () => {{
        if !pdfium_auto::is_pdfium_cached() {
            println!("SKIP: no cached pdfium; set PDFIUM_LIB_PATH to run extraction tests");
            return;
        }
        PdfiumExtractor::bind().expect("pdfium is cached but failed to bind")
    }};
}

/// Build a minimal PDF with one page per entry; each page shows its lines
/// top to bottom in Helvetica.
fn menu_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let page_count = pages.len();
    // 1: catalog, 2: pages, 3: font, then (page, content) pairs.
    let page_id = |i: usize| 4 + 2 * i;
    let content_id = |i: usize| 5 + 2 * i;

    let mut objects: Vec<String> = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".into());
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", page_id(i))).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        page_count
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".into());

    for (i, lines) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            content_id(i)
        ));
        let mut stream = String::from("BT /F1 12 Tf 72 760 Td 16 TL\n");
        for line in lines.iter() {
            stream.push_str(&format!("({line}) Tj T*\n"));
        }
        stream.push_str("ET");
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (idx, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", idx + 1, body));
    }
    let xref_at = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));
    pdf.into_bytes()
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in {haystack:?}"))
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn extracts_single_line_menu() {
    let extractor = skip_unless_pdfium!();
    let text = extractor.extract_text(&menu_pdf(&[&["Burger $5"]])).unwrap();
    assert_eq!(text.trim(), "Burger $5");
}

#[test]
fn pages_come_out_in_natural_order() {
    let extractor = skip_unless_pdfium!();
    let pdf = menu_pdf(&[
        &["Breakfast", "Porridge $4", "Omelette $6"],
        &["Lunch", "Burger $5", "Caesar Salad $7"],
        &["Dinner", "Steak $18"],
    ]);

    let text = extractor.extract_text(&pdf).unwrap();

    let order = [
        "Breakfast",
        "Porridge $4",
        "Omelette $6",
        "Lunch",
        "Burger $5",
        "Caesar Salad $7",
        "Dinner",
        "Steak $18",
    ];
    let mut last = 0;
    for item in order {
        let at = position(&text, item);
        assert!(at >= last, "{item:?} out of order in {text:?}");
        last = at;
    }
    assert!(!text.contains('\r'), "line endings not normalised: {text:?}");
    assert_eq!(text, text.trim_end());
}

#[test]
fn blank_page_yields_empty_text() {
    let extractor = skip_unless_pdfium!();
    let text = extractor.extract_text(&menu_pdf(&[&[]])).unwrap();
    assert_eq!(text, "");
}

#[test]
fn truncated_document_is_parse_error() {
    let extractor = skip_unless_pdfium!();
    let err = extractor
        .extract_text(b"%PDF-1.7\n1 0 obj\n<< /Type /Cat")
        .unwrap_err();
    assert!(matches!(err, SuggestError::DocumentParse(_)), "got: {err:?}");
}

#[test]
fn base64_round_trip_feeds_the_prompt() {
    let extractor = skip_unless_pdfium!();
    let encoded = STANDARD.encode(menu_pdf(&[&["Burger $5"]]));

    let bytes = decode_document(&encoded).unwrap();
    let text = extractor.extract_text(&bytes).unwrap();
    let targets = NutritionTargets {
        meal_time: "lunch".into(),
        protein: 40,
        carbs: 50,
        fat: 15,
        target_energy: 600,
        energy_unit: "kcal".into(),
        weight_unit: "g".into(),
    };
    let prompt = Prompt::for_request(&text, &targets);

    assert!(
        prompt.user.contains("This is the restaurant menu Burger $5."),
        "got: {}",
        prompt.user
    );
}

#[tokio::test]
async fn suggester_extracts_on_the_blocking_pool() {
    let extractor = skip_unless_pdfium!();
    let config = fitmymacros_pdfreader::CompletionConfig::builder()
        .endpoint("http://127.0.0.1:9/unused")
        .model("gpt-test")
        .api_key("sk-test")
        .build()
        .unwrap();
    let suggester = MenuSuggester::with_openai(Arc::new(extractor), config);

    let encoded = STANDARD.encode(menu_pdf(&[&["Soup $4"], &["Pie $6"]]));
    let text = suggester.extract_menu_text(&encoded).await.unwrap();

    assert!(position(&text, "Soup $4") < position(&text, "Pie $6"));
}
