// Colored terminal output for previews, screening outcomes and listings.
//
// The CLI delegates all terminal formatting here.

use colored::Colorize;

use super::{single_line, truncate_chars};
use crate::db::models::{DocumentStatus, DocumentStatusReport, StoredDocument};
use crate::pipeline::preview::DocumentPreview;
use crate::pipeline::submission::SubmissionOutcome;
use crate::similarity::{Completeness, MatchDetail};

/// Display the preview analysis of an uploaded file.
pub fn display_preview(file_name: &str, preview: &DocumentPreview) {
    println!("\n{}", format!("=== Analysis of {file_name} ===").bold());

    println!("\n  {}", "Keywords".bold());
    if preview.keywords.is_empty() {
        println!("    {}", "(none found)".dimmed());
    } else {
        println!("    {}", preview.keywords.join(", "));
    }

    println!("\n  {}", "Abstract".bold());
    if preview.abstract_text.is_empty() {
        println!("    {}", "(no abstract found)".dimmed());
    } else {
        println!("    {}", truncate_chars(&single_line(&preview.abstract_text), 600));
    }

    println!("\n  {}", "Summary".bold());
    if preview.summary.is_empty() {
        println!("    {}", "(no summary available)".dimmed());
    } else {
        println!("    {}", single_line(&preview.summary));
    }
    println!();
}

/// Display the outcome of screening one submission.
pub fn display_submission_outcome(outcome: &SubmissionOutcome) {
    println!(
        "\n{}",
        format!("=== Screening for document #{} ===", outcome.document_id).bold()
    );
    println!("  Status: {}", colorize_status(outcome.decided_status));

    if let Some(failure) = &outcome.failure {
        println!("  {} {}", "Screening failed:".yellow(), failure);
        println!(
            "  {}",
            "The document was kept as pending. Run `docscreen recheck` to retry.".dimmed()
        );
        return;
    }

    println!("  Similarity score: {:.1}/100", outcome.score);
    if outcome.completeness == Completeness::Partial {
        println!(
            "  {}",
            "Scan incomplete (timeout); the status may change on recheck.".yellow()
        );
    }
    for skipped in &outcome.skipped {
        println!(
            "  {} document #{}: {}",
            "skipped".dimmed(),
            skipped.document_id,
            skipped.reason
        );
    }
    display_match_details(&outcome.details, |_| None);
}

/// Display the stored screening outcome of a document.
///
/// `title_of` resolves a matched document id to its title when known.
pub fn display_status_report<F>(id: i64, report: &DocumentStatusReport, title_of: F)
where
    F: Fn(i64) -> Option<String>,
{
    println!("\n{}", format!("=== Document #{id} ===").bold());
    println!("  Status: {}", colorize_status(report.status));
    println!("  Similarity score: {:.1}/100", report.plagiarism_score);
    display_match_details(&report.plagiarism_details, title_of);
}

fn display_match_details<F>(details: &[MatchDetail], title_of: F)
where
    F: Fn(i64) -> Option<String>,
{
    if details.is_empty() {
        println!("  {}", "No significant matches.".green());
        return;
    }

    println!("\n  {} matching document(s):", details.len());
    for detail in details {
        let label = match title_of(detail.matched_document_id) {
            Some(title) => format!("#{} \"{}\"", detail.matched_document_id, title),
            None => format!("#{}", detail.matched_document_id),
        };
        println!(
            "    {:>5.1}%  {}",
            detail.match_percentage,
            label
        );
        println!(
            "            {}",
            truncate_chars(&single_line(&detail.preview), 100).dimmed()
        );
    }
}

/// Display a list of documents, optionally with their relevance scores.
pub fn display_document_list(documents: &[(StoredDocument, Option<u32>)]) {
    if documents.is_empty() {
        println!("No documents found.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Documents ({}) ===", documents.len()).bold()
    );
    println!();
    println!(
        "  {:>5}  {:<40} {:<20} {:<10} {:>6}  {:>5}",
        "ID".dimmed(),
        "Title".dimmed(),
        "Type".dimmed(),
        "Status".dimmed(),
        "Score".dimmed(),
        "Rel".dimmed(),
    );
    println!("  {}", "-".repeat(96).dimmed());

    for (doc, relevance) in documents {
        let relevance = relevance.map(|r| r.to_string()).unwrap_or_default();
        println!(
            "  {:>5}  {:<40} {:<20} {:<10} {:>6.1}  {:>5}",
            doc.id,
            truncate_chars(&doc.title, 37),
            doc.doc_type.as_str(),
            colorize_status(doc.status),
            doc.plagiarism_score,
            relevance,
        );
    }
    println!();
}

/// Colorize a document status.
fn colorize_status(status: DocumentStatus) -> colored::ColoredString {
    match status {
        DocumentStatus::Approved => status.as_str().green(),
        DocumentStatus::Rejected => status.as_str().red().bold(),
        DocumentStatus::Pending => status.as_str().yellow(),
    }
}
