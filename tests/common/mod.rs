// Shared fixtures for the integration tests: tiny PDF and DOCX files built
// in memory, and document metadata for the database.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use docscreen::db::models::{DocumentType, NewDocument};
use docscreen::extract::{DOCX_MIME, PDF_MIME};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// A PDF with one page per entry, each page drawing its lines in Courier.
pub fn pdf_bytes(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 760.into()]),
        ];
        for line in lines.iter() {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("Td", vec![0.into(), (-14).into()]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// A minimal DOCX whose body holds one `w:p` per paragraph.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", xml_escape(p)))
        .collect();
    let document_xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
          <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
          <Override PartName=\"/word/document.xml\" \
          ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
          </Types>",
    )
    .unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document_xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Metadata for a DOCX research paper with the given paragraphs.
pub fn new_docx_document(title: &str, paragraphs: &[&str]) -> NewDocument {
    NewDocument {
        title: title.to_string(),
        author: "r.researcher".to_string(),
        doc_type: DocumentType::ResearchPaper,
        abstract_text: String::new(),
        keywords: vec![],
        course: None,
        department: "Computer Science".to_string(),
        institution: "State University".to_string(),
        file_bytes: docx_bytes(paragraphs),
        content_type: DOCX_MIME.to_string(),
        original_name: format!("{}.docx", title.to_lowercase().replace(' ', "_")),
    }
}

/// Metadata for a single-page PDF research paper.
pub fn new_pdf_document(title: &str, lines: &[&str]) -> NewDocument {
    NewDocument {
        file_bytes: pdf_bytes(&[lines]),
        content_type: PDF_MIME.to_string(),
        original_name: format!("{}.pdf", title.to_lowercase().replace(' ', "_")),
        ..new_docx_document(title, &[])
    }
}

pub const SOIL_PAPER: &[&str] = &[
    "Soil Moisture Sensing With Low Cost Capacitive Probes",
    "Abstract. This study evaluates capacitive probes for measuring soil moisture in \
     smallholder farms. We compare probe readings against gravimetric samples across \
     three soil types and two growing seasons.",
    "Introduction. Irrigation scheduling depends on reliable moisture data. Commercial \
     sensors remain expensive, so many farms irrigate on a fixed calendar instead.",
    "Results show that calibrated capacitive probes track gravimetric moisture within \
     four percent. Clay soils needed a separate calibration curve.",
];

pub const RIVER_PAPER: &[&str] = &[
    "Sediment Transport In Braided Rivers",
    "Abstract. We model bedload transport in braided gravel rivers using repeat drone \
     surveys and a two dimensional morphodynamic model.",
    "Channel avulsions dominate the sediment budget during floods. Our model reproduces \
     observed bar migration over a decade of surveys.",
];
