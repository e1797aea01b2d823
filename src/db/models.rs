// Data models: Rust structs that map to database rows.
//
// Kept separate from the queries so the pipeline and output modules can use
// them without depending on rusqlite directly.

use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::similarity::MatchDetail;

/// Screening status of a submitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Not screened yet, or screening failed and needs a retry or a human.
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for DocumentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(DocumentStatus::Pending),
            "approved" => Ok(DocumentStatus::Approved),
            "rejected" => Ok(DocumentStatus::Rejected),
            other => anyhow::bail!("Unknown document status: {other}"),
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of academic document was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    ResearchPaper,
    CourseProject,
    ReviewPaper,
    ApplicationDocument,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::ResearchPaper => "research_paper",
            DocumentType::CourseProject => "course_project",
            DocumentType::ReviewPaper => "review_paper",
            DocumentType::ApplicationDocument => "application_document",
        }
    }
}

impl FromStr for DocumentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "research_paper" => Ok(DocumentType::ResearchPaper),
            "course_project" => Ok(DocumentType::CourseProject),
            "review_paper" => Ok(DocumentType::ReviewPaper),
            "application_document" => Ok(DocumentType::ApplicationDocument),
            other => anyhow::bail!(
                "Unknown document type: {other} (expected research_paper, course_project, \
                 review_paper or application_document)"
            ),
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A document about to be persisted. Always stored as `pending`.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub author: String,
    pub doc_type: DocumentType,
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub course: Option<String>,
    pub department: String,
    pub institution: String,
    pub file_bytes: Vec<u8>,
    /// Declared MIME type of `file_bytes`.
    pub content_type: String,
    pub original_name: String,
}

impl NewDocument {
    /// Check the metadata rules enforced before anything is written.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            anyhow::bail!("Please provide a title");
        }
        if self.department.trim().is_empty() {
            anyhow::bail!("Please provide a department");
        }
        if self.institution.trim().is_empty() {
            anyhow::bail!("Please provide an institution");
        }
        if self.doc_type == DocumentType::CourseProject
            && self.course.as_deref().is_none_or(|c| c.trim().is_empty())
        {
            anyhow::bail!("A course is required for course projects");
        }
        if self.file_bytes.is_empty() {
            anyhow::bail!("Please upload a document");
        }
        Ok(())
    }
}

/// A persisted document without its file payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub doc_type: DocumentType,
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub course: Option<String>,
    pub department: String,
    pub institution: String,
    pub content_type: String,
    pub original_name: String,
    pub status: DocumentStatus,
    pub plagiarism_score: f64,
    pub plagiarism_details: Vec<MatchDetail>,
    pub created_at: String,
    pub updated_at: String,
}

/// The screening outcome of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStatusReport {
    pub status: DocumentStatus,
    pub plagiarism_score: f64,
    pub plagiarism_details: Vec<MatchDetail>,
}

/// Optional filters for listing documents. `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub doc_type: Option<DocumentType>,
    pub department: Option<String>,
    pub institution: Option<String>,
}
