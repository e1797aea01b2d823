use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use docscreen::config::Config;
use docscreen::db::models::{DocumentFilter, DocumentStatus, DocumentType, NewDocument};
use docscreen::db::Database;
use docscreen::extract::{self, ContentType, SourceDocument};
use docscreen::pipeline::submission::SubmissionPipeline;
use docscreen::similarity::dice::BigramDice;
use docscreen::similarity::SimilarityScorer;

/// docscreen: screening for academic document submissions.
///
/// Extracts text from PDF and DOCX uploads, suggests keywords, an abstract
/// and a summary, and screens submissions for lexical similarity against
/// previously approved documents.
#[derive(Parser)]
#[command(name = "docscreen", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Suggest keywords, an abstract and a summary for a file (nothing is stored)
    Analyze {
        /// Path to a .pdf or .docx file
        file: String,
    },

    /// Store a document and screen it against the approved corpus
    Submit {
        /// Path to a .pdf or .docx file
        file: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        /// research_paper, course_project, review_paper or application_document
        #[arg(long)]
        doc_type: DocumentType,

        #[arg(long)]
        department: String,

        #[arg(long)]
        institution: String,

        /// Required for course projects
        #[arg(long)]
        course: Option<String>,

        /// Abstract text (suggested from the file when omitted)
        #[arg(long = "abstract")]
        abstract_text: Option<String>,

        /// Comma-separated keywords (suggested from the file when omitted)
        #[arg(long)]
        keywords: Option<String>,
    },

    /// Re-run screening for a stored document (resolves pending documents)
    #[command(group(ArgGroup::new("target").required(true).args(["id", "all_pending"])))]
    Recheck {
        /// Document id
        id: Option<i64>,

        /// Re-screen every pending document
        #[arg(long)]
        all_pending: bool,
    },

    /// Show a document's status, similarity score and matches
    Status {
        /// Document id
        id: i64,
    },

    /// Manually approve or reject a document
    #[command(group(ArgGroup::new("decision").required(true).args(["approve", "reject"])))]
    Review {
        /// Document id
        id: i64,

        #[arg(long)]
        approve: bool,

        #[arg(long)]
        reject: bool,
    },

    /// List documents, optionally filtered and ranked by relevance to a query
    Search {
        /// Free-text query matched against title, keywords and abstract
        #[arg(long)]
        query: Option<String>,

        #[arg(long)]
        doc_type: Option<DocumentType>,

        #[arg(long)]
        department: Option<String>,

        #[arg(long)]
        institution: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("docscreen=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing docscreen database...");
            let db = docscreen::db::initialize_sqlite(&config.db_path)?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext: cargo run -- submit <file> --title ... to add a document");
        }

        Commands::Analyze { file } => {
            let source = read_source(&file, config.max_document_bytes)?;
            match docscreen::pipeline::preview::run(&source, config.max_document_bytes).await {
                Ok(preview) => {
                    docscreen::output::terminal::display_preview(&source.original_name, &preview)
                }
                Err(e) => {
                    warn!(file = %file, error = %e, "Preview analysis failed");
                    println!(
                        "{} analysis unavailable, please fill in manually ({e})",
                        "Note:".yellow()
                    );
                }
            }
        }

        Commands::Submit {
            file,
            title,
            author,
            doc_type,
            department,
            institution,
            course,
            abstract_text,
            keywords,
        } => {
            let db = docscreen::db::open_sqlite(&config.db_path)?;
            let source = read_source(&file, config.max_document_bytes)?;

            // Fill in missing metadata from a best-effort preview. A failed
            // preview leaves the fields empty; it never blocks the submission.
            let mut keywords: Vec<String> = keywords
                .map(|k| {
                    k.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            let mut abstract_text = abstract_text.unwrap_or_default();
            if keywords.is_empty() || abstract_text.is_empty() {
                match docscreen::pipeline::preview::run(&source, config.max_document_bytes).await {
                    Ok(preview) => {
                        if keywords.is_empty() {
                            keywords = preview.keywords;
                        }
                        if abstract_text.is_empty() {
                            abstract_text = preview.abstract_text;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Preview unavailable, submitting without suggestions");
                    }
                }
            }

            let new_doc = NewDocument {
                title,
                author,
                doc_type,
                abstract_text,
                keywords,
                course,
                department,
                institution,
                file_bytes: source.raw_bytes.clone(),
                content_type: source.content_type.clone(),
                original_name: source.original_name.clone(),
            };
            new_doc.validate()?;

            let document_id = db.insert_document(&new_doc).await?;
            println!("Stored document #{document_id} (pending screening)");

            let pipeline = build_pipeline(&config);
            let outcome = pipeline.run(db.as_ref(), document_id, &source).await?;
            docscreen::output::terminal::display_submission_outcome(&outcome);
        }

        Commands::Recheck { id, all_pending } => {
            let db = docscreen::db::open_sqlite(&config.db_path)?;
            let pipeline = build_pipeline(&config);

            if all_pending {
                recheck_all_pending(&db, &pipeline).await?;
            } else if let Some(id) = id {
                let outcome = pipeline.recheck(db.as_ref(), id).await?;
                docscreen::output::terminal::display_submission_outcome(&outcome);
            }
        }

        Commands::Status { id } => {
            let db = docscreen::db::open_sqlite(&config.db_path)?;
            let report = db
                .get_status(id)
                .await?
                .with_context(|| format!("Document {id} not found"))?;

            // Resolve matched document titles for display
            let mut titles = std::collections::HashMap::new();
            for detail in &report.plagiarism_details {
                if let Some(doc) = db.get_document(detail.matched_document_id).await? {
                    titles.insert(doc.id, doc.title);
                }
            }

            docscreen::output::terminal::display_status_report(id, &report, |matched| {
                titles.get(&matched).cloned()
            });
        }

        Commands::Review {
            id,
            approve,
            reject,
        } => {
            let db = docscreen::db::open_sqlite(&config.db_path)?;
            let status = match (approve, reject) {
                (true, false) => DocumentStatus::Approved,
                (false, true) => DocumentStatus::Rejected,
                _ => anyhow::bail!("Pass exactly one of --approve or --reject"),
            };
            db.set_status(id, status).await?;
            info!(document_id = id, status = %status, "Manual review recorded");
            println!("Document #{id} marked {status}");
        }

        Commands::Search {
            query,
            doc_type,
            department,
            institution,
        } => {
            let db = docscreen::db::open_sqlite(&config.db_path)?;
            let filter = DocumentFilter {
                doc_type,
                department,
                institution,
            };
            let documents = db.list_documents(&filter).await?;

            let mut rows: Vec<_> = match query.as_deref().filter(|q| !q.trim().is_empty()) {
                Some(q) => documents
                    .into_iter()
                    .map(|doc| {
                        let score = docscreen::analysis::relevance::relevance_score(
                            &doc.title,
                            &doc.keywords,
                            &doc.abstract_text,
                            q,
                        );
                        (doc, Some(score))
                    })
                    .collect(),
                None => documents.into_iter().map(|doc| (doc, None)).collect(),
            };
            // Stable: equally relevant documents stay newest first
            rows.sort_by(|a, b| b.1.cmp(&a.1));

            docscreen::output::terminal::display_document_list(&rows);
        }
    }

    Ok(())
}

/// Read an upload from disk, enforcing the size cap before reading it.
fn read_source(path: &str, max_document_bytes: usize) -> Result<SourceDocument> {
    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());
    let content_type = ContentType::from_file_name(&file_name)?;

    let size = std::fs::metadata(path)
        .with_context(|| format!("Cannot read {path}"))?
        .len();
    extract::ensure_within_limit(usize::try_from(size).unwrap_or(usize::MAX), max_document_bytes)?;

    let raw_bytes = std::fs::read(path).with_context(|| format!("Cannot read {path}"))?;
    Ok(SourceDocument::new(raw_bytes, content_type.mime(), &file_name))
}

fn build_pipeline(config: &Config) -> SubmissionPipeline {
    let scorer = SimilarityScorer::new(Arc::new(BigramDice), config.scan_settings());
    SubmissionPipeline::new(scorer, config.decision_policy(), config.max_document_bytes)
}

/// Re-screen every pending document, oldest first.
async fn recheck_all_pending(db: &Arc<dyn Database>, pipeline: &SubmissionPipeline) -> Result<()> {
    let pending = db.list_pending().await?;
    if pending.is_empty() {
        println!("No pending documents.");
        return Ok(());
    }

    println!("Re-screening {} pending document(s)...", pending.len());
    let pb = ProgressBar::new(pending.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Screening [{bar:30}] {pos}/{len} ({eta})")
            .context("Invalid progress bar template")?,
    );

    let mut outcomes = Vec::with_capacity(pending.len());
    for id in pending {
        match pipeline.recheck(db.as_ref(), id).await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => warn!(document_id = id, error = %e, "Recheck failed, skipping"),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let count = |status: DocumentStatus| {
        outcomes
            .iter()
            .filter(|o| o.decided_status == status)
            .count()
    };
    println!("\n{}", "Recheck complete.".bold());
    println!("  Approved: {}", count(DocumentStatus::Approved));
    println!("  Rejected: {}", count(DocumentStatus::Rejected));
    println!("  Still pending: {}", count(DocumentStatus::Pending));
    Ok(())
}
