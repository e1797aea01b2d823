// Database queries: CRUD operations for the documents table.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{
    DocumentFilter, DocumentStatus, DocumentStatusReport, NewDocument, StoredDocument,
};
use crate::corpus::CorpusDocument;
use crate::extract::SourceDocument;
use crate::similarity::MatchDetail;

const DOCUMENT_COLUMNS: &str = "id, title, author, doc_type, abstract, keywords, course,
    department, institution, content_type, original_name, status, plagiarism_score,
    plagiarism_details, created_at, updated_at";

/// Raw row with enum and JSON columns still as text.
struct DocumentRow {
    id: i64,
    title: String,
    author: String,
    doc_type: String,
    abstract_text: String,
    keywords: String,
    course: Option<String>,
    department: String,
    institution: String,
    content_type: String,
    original_name: String,
    status: String,
    plagiarism_score: f64,
    plagiarism_details: String,
    created_at: String,
    updated_at: String,
}

impl DocumentRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            doc_type: row.get(3)?,
            abstract_text: row.get(4)?,
            keywords: row.get(5)?,
            course: row.get(6)?,
            department: row.get(7)?,
            institution: row.get(8)?,
            content_type: row.get(9)?,
            original_name: row.get(10)?,
            status: row.get(11)?,
            plagiarism_score: row.get(12)?,
            plagiarism_details: row.get(13)?,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
        })
    }

    fn into_document(self) -> Result<StoredDocument> {
        Ok(StoredDocument {
            id: self.id,
            title: self.title,
            author: self.author,
            doc_type: self.doc_type.parse()?,
            abstract_text: self.abstract_text,
            keywords: serde_json::from_str(&self.keywords)
                .with_context(|| format!("Bad keywords JSON for document {}", self.id))?,
            course: self.course,
            department: self.department,
            institution: self.institution,
            content_type: self.content_type,
            original_name: self.original_name,
            status: self.status.parse()?,
            plagiarism_score: self.plagiarism_score,
            plagiarism_details: serde_json::from_str(&self.plagiarism_details)
                .with_context(|| format!("Bad plagiarism details JSON for document {}", self.id))?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// --- Documents ---

/// Persist a new document with status `pending` and return its id.
pub fn insert_document(conn: &Connection, doc: &NewDocument) -> Result<i64> {
    let keywords_json = serde_json::to_string(&doc.keywords)?;
    conn.execute(
        "INSERT INTO documents (title, author, doc_type, abstract, keywords, course,
                                department, institution, file_data, content_type, original_name)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            doc.title.trim(),
            doc.author,
            doc.doc_type.as_str(),
            doc.abstract_text,
            keywords_json,
            doc.course,
            doc.department,
            doc.institution,
            doc.file_bytes,
            doc.content_type,
            doc.original_name,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Load a document's metadata and screening outcome.
pub fn get_document(conn: &Connection, id: i64) -> Result<Option<StoredDocument>> {
    let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1");
    let row = conn
        .query_row(&sql, params![id], DocumentRow::from_row)
        .optional()?;
    row.map(DocumentRow::into_document).transpose()
}

/// Load the uploaded file of a document.
pub fn get_document_file(conn: &Connection, id: i64) -> Result<Option<SourceDocument>> {
    let result = conn
        .query_row(
            "SELECT file_data, content_type, original_name FROM documents WHERE id = ?1",
            params![id],
            |row| {
                Ok(SourceDocument {
                    raw_bytes: row.get(0)?,
                    content_type: row.get(1)?,
                    original_name: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(result)
}

/// Status, score and match details of a document.
pub fn get_status(conn: &Connection, id: i64) -> Result<Option<DocumentStatusReport>> {
    let row: Option<(String, f64, String)> = conn
        .query_row(
            "SELECT status, plagiarism_score, plagiarism_details FROM documents WHERE id = ?1",
            params![id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;

    match row {
        Some((status, plagiarism_score, details_json)) => Ok(Some(DocumentStatusReport {
            status: status.parse()?,
            plagiarism_score,
            plagiarism_details: serde_json::from_str(&details_json)?,
        })),
        None => Ok(None),
    }
}

/// Store the outcome of a similarity screening.
pub fn record_analysis(
    conn: &Connection,
    id: i64,
    score: f64,
    details: &[MatchDetail],
    status: DocumentStatus,
) -> Result<()> {
    let details_json = serde_json::to_string(details)?;
    let updated = conn.execute(
        "UPDATE documents
         SET plagiarism_score = ?2, plagiarism_details = ?3, status = ?4,
             updated_at = datetime('now')
         WHERE id = ?1",
        params![id, score, details_json, status.as_str()],
    )?;
    if updated == 0 {
        anyhow::bail!("Document {id} not found");
    }
    Ok(())
}

/// Change a document's status without touching its screening results.
pub fn set_status(conn: &Connection, id: i64, status: DocumentStatus) -> Result<()> {
    let updated = conn.execute(
        "UPDATE documents SET status = ?2, updated_at = datetime('now') WHERE id = ?1",
        params![id, status.as_str()],
    )?;
    if updated == 0 {
        anyhow::bail!("Document {id} not found");
    }
    Ok(())
}

/// List documents matching the filter, newest first.
pub fn list_documents(conn: &Connection, filter: &DocumentFilter) -> Result<Vec<StoredDocument>> {
    let sql = format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents
         WHERE (?1 IS NULL OR doc_type = ?1)
           AND (?2 IS NULL OR department = ?2)
           AND (?3 IS NULL OR institution = ?3)
         ORDER BY created_at DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(
            params![
                filter.doc_type.map(|t| t.as_str()),
                filter.department,
                filter.institution,
            ],
            DocumentRow::from_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(DocumentRow::into_document).collect()
}

/// Ids of all documents still waiting for a screening decision.
pub fn list_pending(conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM documents WHERE status = 'pending' ORDER BY id")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
}

// --- Corpus ---

/// Approved documents other than `exclude_id`, oldest first.
pub fn list_comparable(conn: &Connection, exclude_id: i64) -> Result<Vec<CorpusDocument>> {
    let mut stmt = conn.prepare(
        "SELECT id, file_data, content_type FROM documents
         WHERE status = 'approved' AND id != ?1
         ORDER BY id",
    )?;
    let docs = stmt
        .query_map(params![exclude_id], |row| {
            Ok(CorpusDocument {
                id: row.get(0)?,
                file_bytes: row.get(1)?,
                content_type: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(docs)
}
