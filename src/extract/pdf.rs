// PDF text extraction via lopdf (pure Rust, works from memory).

use lopdf::Document;
use tracing::debug;

use crate::error::{AnalysisError, AnalysisResult};

/// Extract the text of every page, in page order, separated by blank lines.
///
/// A buffer that lopdf cannot load, or that loads but has no page tree, is
/// reported as corrupt. So is any page whose content stream fails to decode:
/// returning the pages that did work would hand partial text to the scorer.
pub fn extract_pdf(raw_bytes: &[u8]) -> AnalysisResult<String> {
    let document = Document::load_mem(raw_bytes)
        .map_err(|e| AnalysisError::CorruptDocument(format!("PDF load failed: {e}")))?;

    let pages = document.get_pages();
    if pages.is_empty() {
        return Err(AnalysisError::CorruptDocument(
            "PDF has no pages".to_string(),
        ));
    }

    let mut page_texts = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        let text = document.extract_text(&[*page_number]).map_err(|e| {
            AnalysisError::CorruptDocument(format!("page {page_number} unreadable: {e}"))
        })?;
        page_texts.push(text.trim().to_string());
    }

    debug!(pages = page_texts.len(), "Extracted PDF text");
    Ok(page_texts.join("\n\n"))
}
