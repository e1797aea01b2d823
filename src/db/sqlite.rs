// SqliteDatabase: rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{
    DocumentFilter, DocumentStatus, DocumentStatusReport, NewDocument, StoredDocument,
};
use super::queries;
use super::traits::Database;
use crate::corpus::{CorpusDocument, CorpusSource};
use crate::extract::SourceDocument;
use crate::similarity::MatchDetail;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl CorpusSource for SqliteDatabase {
    async fn list_comparable(&self, exclude_id: i64) -> Result<Vec<CorpusDocument>> {
        let conn = self.conn.lock().await;
        queries::list_comparable(&conn, exclude_id)
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn insert_document(&self, doc: &NewDocument) -> Result<i64> {
        let conn = self.conn.lock().await;
        queries::insert_document(&conn, doc)
    }

    async fn get_document(&self, id: i64) -> Result<Option<StoredDocument>> {
        let conn = self.conn.lock().await;
        queries::get_document(&conn, id)
    }

    async fn get_document_file(&self, id: i64) -> Result<Option<SourceDocument>> {
        let conn = self.conn.lock().await;
        queries::get_document_file(&conn, id)
    }

    async fn get_status(&self, id: i64) -> Result<Option<DocumentStatusReport>> {
        let conn = self.conn.lock().await;
        queries::get_status(&conn, id)
    }

    async fn record_analysis(
        &self,
        id: i64,
        score: f64,
        details: &[MatchDetail],
        status: DocumentStatus,
    ) -> Result<()> {
        let conn = self.conn.lock().await;
        queries::record_analysis(&conn, id, score, details, status)
    }

    async fn set_status(&self, id: i64, status: DocumentStatus) -> Result<()> {
        let conn = self.conn.lock().await;
        queries::set_status(&conn, id, status)
    }

    async fn list_documents(&self, filter: &DocumentFilter) -> Result<Vec<StoredDocument>> {
        let conn = self.conn.lock().await;
        queries::list_documents(&conn, filter)
    }

    async fn list_pending(&self) -> Result<Vec<i64>> {
        let conn = self.conn.lock().await;
        queries::list_pending(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::DocumentType;

    async fn test_db() -> SqliteDatabase {
        let conn = Connection::open_in_memory().unwrap();
        super::super::schema::create_tables(&conn).unwrap();
        SqliteDatabase::new(conn)
    }

    fn new_doc(title: &str) -> NewDocument {
        NewDocument {
            title: title.to_string(),
            author: "author".to_string(),
            doc_type: DocumentType::ReviewPaper,
            abstract_text: String::new(),
            keywords: vec![],
            course: None,
            department: "Dept".to_string(),
            institution: "Uni".to_string(),
            file_bytes: b"data".to_vec(),
            content_type: crate::extract::DOCX_MIME.to_string(),
            original_name: format!("{title}.docx"),
        }
    }

    #[tokio::test]
    async fn test_trait_table_count() {
        let db = test_db().await;
        assert_eq!(db.table_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_trait_corpus_is_approved_documents() {
        let db = test_db().await;
        let a = db.insert_document(&new_doc("a")).await.unwrap();
        let b = db.insert_document(&new_doc("b")).await.unwrap();
        assert!(db.list_comparable(0).await.unwrap().is_empty());

        db.set_status(a, DocumentStatus::Approved).await.unwrap();
        db.set_status(b, DocumentStatus::Approved).await.unwrap();
        let corpus = db.list_comparable(b).await.unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].id, a);
        assert_eq!(corpus[0].content_type, crate::extract::DOCX_MIME);
    }

    #[tokio::test]
    async fn test_trait_status_report() {
        let db = test_db().await;
        let id = db.insert_document(&new_doc("a")).await.unwrap();
        db.record_analysis(id, 12.0, &[], DocumentStatus::Approved)
            .await
            .unwrap();
        let report = db.get_status(id).await.unwrap().unwrap();
        assert_eq!(report.status, DocumentStatus::Approved);
        assert!((report.plagiarism_score - 12.0).abs() < 1e-9);
    }
}
