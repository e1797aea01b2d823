// Analysis pipelines: the two flows that sit on top of extraction.
//
// preview:    extract -> keywords / abstract / summary (no corpus, no writes)
// submission: extract -> corpus similarity -> status decision -> persist
//
// Failure handling differs on purpose. A preview failure is returned to the
// caller, who falls back to manual entry. A submission failure never undoes
// the document that was already stored; it is left `pending` instead.

pub mod preview;
pub mod submission;

use crate::error::{AnalysisError, AnalysisResult};
use crate::extract::{self, SourceDocument};

/// Run `f` over the extracted text of `source` on the blocking pool.
///
/// Parsing is CPU-bound, so it stays off the async workers. A panic inside
/// the parser is reported as a corrupt document.
pub(crate) async fn with_extracted_text<T, F>(source: &SourceDocument, f: F) -> AnalysisResult<T>
where
    T: Send + 'static,
    F: FnOnce(String) -> T + Send + 'static,
{
    let raw_bytes = source.raw_bytes.clone();
    let content_type = source.content_type.clone();

    tokio::task::spawn_blocking(move || extract::extract(&raw_bytes, &content_type).map(f))
        .await
        .map_err(|e| AnalysisError::CorruptDocument(format!("extraction worker failed: {e}")))?
}
