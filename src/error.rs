// Analysis errors: the failure kinds callers need to tell apart.
//
// Database, config and CLI plumbing use anyhow. The analysis core returns
// these typed errors instead, because the orchestrator treats them
// differently: a corrupt candidate is fatal, a corrupt corpus document is
// skipped, an oversized upload is rejected before anything is parsed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The declared content type is neither PDF nor DOCX.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The parser failed on the candidate document.
    #[error("document could not be parsed: {0}")]
    CorruptDocument(String),

    /// The parser failed on one corpus document during a similarity scan.
    #[error("could not extract text from corpus document {document_id}: {reason}")]
    ComparisonExtractionFailed { document_id: i64, reason: String },

    /// The raw buffer exceeds the configured upload cap.
    #[error("document is {size} bytes, limit is {limit} bytes")]
    DocumentTooLarge { size: usize, limit: usize },
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
