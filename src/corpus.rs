// Corpus collaborator: the read-only source of documents to compare against.
//
// The scorer never caches or mutates the corpus. Each scan works on the
// snapshot returned by one `list_comparable` call, so documents approved
// while a scan is running are not seen by that scan.

use anyhow::Result;
use async_trait::async_trait;

/// One comparable document as stored by the persistence layer.
#[derive(Debug, Clone)]
pub struct CorpusDocument {
    pub id: i64,
    pub file_bytes: Vec<u8>,
    /// Declared MIME type of `file_bytes`.
    pub content_type: String,
}

#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Documents eligible for comparison (approved ones), excluding `exclude_id`.
    async fn list_comparable(&self, exclude_id: i64) -> Result<Vec<CorpusDocument>>;
}

/// A fixed in-memory corpus. Every document in it counts as comparable.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    documents: Vec<CorpusDocument>,
}

impl MemoryCorpus {
    pub fn new(documents: Vec<CorpusDocument>) -> Self {
        Self { documents }
    }

    pub fn push(&mut self, document: CorpusDocument) {
        self.documents.push(document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl CorpusSource for MemoryCorpus {
    async fn list_comparable(&self, exclude_id: i64) -> Result<Vec<CorpusDocument>> {
        Ok(self
            .documents
            .iter()
            .filter(|d| d.id != exclude_id)
            .cloned()
            .collect())
    }
}
