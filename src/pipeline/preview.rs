// Preview flow: pre-fill a submission form from the uploaded file.
//
// Read-only: no corpus access, nothing persisted.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{abstract_select, keywords, summary};
use crate::error::AnalysisResult;
use crate::extract::SourceDocument;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPreview {
    /// Up to ten keywords, most frequent first.
    pub keywords: Vec<String>,
    /// Empty when the document has no usable paragraph.
    pub abstract_text: String,
    /// Up to five sentences in score order.
    pub summary: String,
}

/// Derive the preview artifacts from already extracted text.
pub fn analyze_text(text: &str) -> DocumentPreview {
    DocumentPreview {
        keywords: keywords::extract_keywords(text),
        abstract_text: abstract_select::select_abstract(text),
        summary: summary::generate_summary(text),
    }
}

/// Extract the document and derive its preview.
///
/// Any error here means "analysis unavailable": the caller should let the
/// user fill the fields in by hand, never block the submission.
pub async fn run(source: &SourceDocument, max_document_bytes: usize) -> AnalysisResult<DocumentPreview> {
    source.ensure_within(max_document_bytes)?;

    let preview = super::with_extracted_text(source, |text| analyze_text(&text)).await?;

    info!(
        file = %source.original_name,
        keywords = preview.keywords.len(),
        abstract_chars = preview.abstract_text.chars().count(),
        "Preview analysis complete"
    );
    Ok(preview)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_text_combines_artifacts() {
        let text = "Graph Methods\n\nAbstract: graph methods find structure in graph data.";
        let preview = analyze_text(text);
        assert_eq!(preview.keywords[0], "graph");
        assert_eq!(
            preview.abstract_text,
            "Abstract: graph methods find structure in graph data."
        );
        assert!(preview.summary.contains("graph methods find structure"));
    }

    #[test]
    fn test_analyze_empty_text() {
        let preview = analyze_text("");
        assert!(preview.keywords.is_empty());
        assert_eq!(preview.abstract_text, "");
        assert_eq!(preview.summary, "");
    }
}
