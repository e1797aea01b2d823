// Text extraction: raw upload bytes to normalized plain text.
//
// Two backends: `pdf` (lopdf, page text in document order) and `docx`
// (zip + quick-xml over word/document.xml, paragraph text in document order).
// Both emit paragraphs separated by a blank line so the abstract selector can
// split on blank-line boundaries regardless of the source format.

pub mod docx;
pub mod pdf;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Upload cap inherited from the submission boundary (10 MiB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// The document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    Pdf,
    Docx,
}

impl ContentType {
    /// Resolve a declared MIME type. Anything else is `UnsupportedFormat`.
    pub fn from_mime(mime: &str) -> AnalysisResult<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            PDF_MIME => Ok(ContentType::Pdf),
            DOCX_MIME => Ok(ContentType::Docx),
            other => Err(AnalysisError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Infer the content type from a file name's extension.
    pub fn from_file_name(name: &str) -> AnalysisResult<Self> {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(ContentType::Pdf),
            "docx" => Ok(ContentType::Docx),
            _ => Err(AnalysisError::UnsupportedFormat(format!(
                "{name} (expected a .pdf or .docx file)"
            ))),
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Pdf => PDF_MIME,
            ContentType::Docx => DOCX_MIME,
        }
    }
}

/// An uploaded document, held only for the duration of one analysis call.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub raw_bytes: Vec<u8>,
    /// Declared MIME type, as received from the upload boundary.
    pub content_type: String,
    pub original_name: String,
}

impl SourceDocument {
    pub fn new(raw_bytes: Vec<u8>, content_type: &str, original_name: &str) -> Self {
        Self {
            raw_bytes,
            content_type: content_type.to_string(),
            original_name: original_name.to_string(),
        }
    }

    /// Fail fast when the buffer is larger than `limit` bytes.
    pub fn ensure_within(&self, limit: usize) -> AnalysisResult<()> {
        ensure_within_limit(self.raw_bytes.len(), limit)
    }
}

pub fn ensure_within_limit(size: usize, limit: usize) -> AnalysisResult<()> {
    if size > limit {
        return Err(AnalysisError::DocumentTooLarge { size, limit });
    }
    Ok(())
}

/// Extract normalized plain text from a raw buffer of the declared MIME type.
///
/// Pure function of its inputs. Parser failures surface as `CorruptDocument`,
/// never as partially extracted text.
pub fn extract(raw_bytes: &[u8], content_type: &str) -> AnalysisResult<String> {
    let text = match ContentType::from_mime(content_type)? {
        ContentType::Pdf => pdf::extract_pdf(raw_bytes)?,
        ContentType::Docx => docx::extract_docx(raw_bytes)?,
    };
    Ok(normalize(&text))
}

/// Unify line endings and strip leading/trailing whitespace.
fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime_known_types() {
        assert_eq!(ContentType::from_mime(PDF_MIME).unwrap(), ContentType::Pdf);
        assert_eq!(ContentType::from_mime(DOCX_MIME).unwrap(), ContentType::Docx);
        assert_eq!(
            ContentType::from_mime(" Application/PDF ").unwrap(),
            ContentType::Pdf
        );
    }

    #[test]
    fn test_from_mime_rejects_legacy_word() {
        let err = ContentType::from_mime("application/msword").unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_from_file_name() {
        assert_eq!(ContentType::from_file_name("thesis.PDF").unwrap(), ContentType::Pdf);
        assert_eq!(ContentType::from_file_name("a.b.docx").unwrap(), ContentType::Docx);
        assert!(ContentType::from_file_name("notes.txt").is_err());
        assert!(ContentType::from_file_name("README").is_err());
    }

    #[test]
    fn test_extract_unsupported_format() {
        let err = extract(b"plain text", "text/plain").unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_size_limit() {
        let doc = SourceDocument::new(vec![0u8; 11], PDF_MIME, "x.pdf");
        assert!(doc.ensure_within(11).is_ok());
        match doc.ensure_within(10) {
            Err(AnalysisError::DocumentTooLarge { size, limit }) => {
                assert_eq!(size, 11);
                assert_eq!(limit, 10);
            }
            other => panic!("expected DocumentTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize("  a\r\nb\rc \n"), "a\nb\nc");
    }
}
