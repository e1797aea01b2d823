// Database trait: backend-agnostic async interface for document storage.
//
// Implementor: SqliteDatabase (wraps rusqlite). Methods are async so a sync
// backend (rusqlite behind a Mutex) and a native async one fit behind the
// same `Arc<dyn Database>`.
//
// Every Database is also a CorpusSource: the corpus is simply the approved
// documents in the store.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{
    DocumentFilter, DocumentStatus, DocumentStatusReport, NewDocument, StoredDocument,
};
use crate::corpus::CorpusSource;
use crate::extract::SourceDocument;
use crate::similarity::MatchDetail;

#[async_trait]
pub trait Database: CorpusSource {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Documents ---

    /// Persist a new document (status `pending`) and return its id.
    async fn insert_document(&self, doc: &NewDocument) -> Result<i64>;

    /// Load a document's metadata and screening outcome.
    async fn get_document(&self, id: i64) -> Result<Option<StoredDocument>>;

    /// Load the uploaded file of a document.
    async fn get_document_file(&self, id: i64) -> Result<Option<SourceDocument>>;

    /// Status, plagiarism score and match details.
    async fn get_status(&self, id: i64) -> Result<Option<DocumentStatusReport>>;

    /// Store a screening outcome (score, details and decided status).
    async fn record_analysis(
        &self,
        id: i64,
        score: f64,
        details: &[MatchDetail],
        status: DocumentStatus,
    ) -> Result<()>;

    /// Change only the status (fallback to pending, manual review).
    async fn set_status(&self, id: i64, status: DocumentStatus) -> Result<()>;

    /// List documents matching the filter, newest first.
    async fn list_documents(&self, filter: &DocumentFilter) -> Result<Vec<StoredDocument>>;

    /// Ids of documents still waiting for a decision.
    async fn list_pending(&self) -> Result<Vec<i64>>;
}
