// DOCX text extraction: raw paragraph text from word/document.xml.
//
// Formatting is discarded. Each <w:p> becomes one paragraph; paragraphs are
// separated by a blank line. <w:tab/> maps to a tab and <w:br/>/<w:cr/> to a
// newline inside the paragraph.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{AnalysisError, AnalysisResult};

const DOCUMENT_PART: &str = "word/document.xml";

/// Decompressed size cap for the main document part.
const MAX_DOCUMENT_PART_BYTES: u64 = 64 * 1024 * 1024;

pub fn extract_docx(raw_bytes: &[u8]) -> AnalysisResult<String> {
    let xml = read_document_part(raw_bytes)?;
    let paragraphs = paragraphs_from_xml(&xml)?;
    Ok(paragraphs.join("\n\n"))
}

fn read_document_part(raw_bytes: &[u8]) -> AnalysisResult<String> {
    let mut archive = ZipArchive::new(Cursor::new(raw_bytes))
        .map_err(|e| AnalysisError::CorruptDocument(format!("unreadable DOCX archive: {e}")))?;

    let part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| AnalysisError::CorruptDocument(format!("missing {DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    let read = part
        .take(MAX_DOCUMENT_PART_BYTES + 1)
        .read_to_string(&mut xml)
        .map_err(|e| AnalysisError::CorruptDocument(format!("cannot read {DOCUMENT_PART}: {e}")))?;
    check_part_size(read as u64, MAX_DOCUMENT_PART_BYTES)?;
    Ok(xml)
}

/// A part that reaches past the cap would only ever be read partially.
fn check_part_size(read: u64, cap: u64) -> AnalysisResult<()> {
    if read > cap {
        return Err(AnalysisError::CorruptDocument(format!(
            "{DOCUMENT_PART} decompresses to more than {cap} bytes"
        )));
    }
    Ok(())
}

fn paragraphs_from_xml(xml: &str) -> AnalysisResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;
    // Tabs and breaks are text only inside a run; <w:tabs> in paragraph
    // properties holds tab-stop definitions.
    let mut in_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = true,
                b"w:r" => in_run = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:r" => in_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" if in_run => current.push('\t'),
                b"w:br" | b"w:cr" if in_run => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t.unescape().map_err(|e| {
                    AnalysisError::CorruptDocument(format!("bad text in {DOCUMENT_PART}: {e}"))
                })?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AnalysisError::CorruptDocument(format!(
                    "malformed {DOCUMENT_PART} at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    // Text after the last closed paragraph (malformed but recoverable)
    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Abstract:</w:t></w:r><w:r><w:t xml:space="preserve"> we study &amp; measure</w:t></w:r></w:p>
<w:p/>
<w:p><w:r><w:t>Col A</w:t><w:tab/><w:t>Col B</w:t><w:br/><w:t>next line</w:t></w:r></w:p>
</w:body>
</w:document>"#;

    #[test]
    fn test_paragraphs_discard_formatting() {
        let paragraphs = paragraphs_from_xml(BODY).unwrap();
        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0], "Abstract: we study & measure");
        assert_eq!(paragraphs[1], "");
        assert_eq!(paragraphs[2], "Col A\tCol B\nnext line");
    }

    #[test]
    fn test_whitespace_between_tags_is_ignored() {
        // The newlines between <w:p> elements are Text events outside <w:t>
        let paragraphs = paragraphs_from_xml(BODY).unwrap();
        assert!(paragraphs.iter().all(|p| !p.starts_with('\n')));
    }

    #[test]
    fn test_mismatched_tags_are_corrupt() {
        let err = paragraphs_from_xml("<w:document><w:p><w:t>x</w:p></w:document>").unwrap_err();
        assert!(matches!(err, AnalysisError::CorruptDocument(_)));
    }

    #[test]
    fn test_tab_stop_definitions_are_not_text() {
        let xml = r#"<w:document><w:body>
<w:p><w:pPr><w:tabs><w:tab w:val="center" w:pos="4680"/></w:tabs></w:pPr><w:r><w:t>Abstract here</w:t></w:r></w:p>
<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:tab/><w:t>indented</w:t></w:r></w:p>
</w:body></w:document>"#;
        let paragraphs = paragraphs_from_xml(xml).unwrap();
        assert_eq!(paragraphs, vec!["Abstract here", "\tindented"]);
    }

    #[test]
    fn test_oversized_part_is_corrupt() {
        assert!(check_part_size(10, 10).is_ok());
        let err = check_part_size(11, 10).unwrap_err();
        assert!(matches!(err, AnalysisError::CorruptDocument(_)));
    }

    #[test]
    fn test_not_a_zip_is_corrupt() {
        let err = extract_docx(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, AnalysisError::CorruptDocument(_)));
    }
}
