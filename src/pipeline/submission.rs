// Submission flow: screen a stored document against the approved corpus.
//
// The document is persisted (as pending) before this runs. Screening then:
// 1. Extracts the document's text
// 2. Snapshots the comparable corpus (approved documents, minus itself)
// 3. Scores similarity against every corpus document
// 4. Decides the status from the score and stores the outcome
//
// If any step fails the document stays `pending` with the failure logged, so
// a retry (`recheck`) or a reviewer can resolve it later.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::corpus::CorpusSource;
use crate::db::models::DocumentStatus;
use crate::db::Database;
use crate::extract::SourceDocument;
use crate::similarity::{
    Completeness, MatchDetail, SimilarityResult, SimilarityScorer, SkippedComparison,
};

/// Turns a similarity score into a status.
#[derive(Debug, Clone)]
pub struct DecisionPolicy {
    /// Scores strictly above this percentage are rejected.
    pub reject_threshold: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            reject_threshold: 30.0,
        }
    }
}

impl DecisionPolicy {
    /// Rejected above the threshold. Otherwise approved, unless the scan was
    /// partial: an unfinished scan can prove a match but not the absence of one.
    pub fn decide(&self, result: &SimilarityResult) -> DocumentStatus {
        if result.score > self.reject_threshold {
            DocumentStatus::Rejected
        } else if result.is_partial() {
            DocumentStatus::Pending
        } else {
            DocumentStatus::Approved
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub document_id: i64,
    /// 0.0 to 100.0
    pub score: f64,
    /// Reported matches in corpus order.
    pub details: Vec<MatchDetail>,
    pub decided_status: DocumentStatus,
    pub completeness: Completeness,
    pub skipped: Vec<SkippedComparison>,
    /// Why screening failed, when the document was left pending.
    pub failure: Option<String>,
}

impl SubmissionOutcome {
    fn from_similarity(document_id: i64, result: SimilarityResult, status: DocumentStatus) -> Self {
        Self {
            document_id,
            score: result.score,
            details: result.details,
            decided_status: status,
            completeness: result.completeness,
            skipped: result.skipped,
            failure: None,
        }
    }

    fn failed(document_id: i64, failure: String) -> Self {
        Self {
            document_id,
            score: 0.0,
            details: Vec::new(),
            decided_status: DocumentStatus::Pending,
            completeness: Completeness::Partial,
            skipped: Vec::new(),
            failure: Some(failure),
        }
    }
}

/// Screens submitted documents and records the decision.
pub struct SubmissionPipeline {
    scorer: SimilarityScorer,
    policy: DecisionPolicy,
    max_document_bytes: usize,
}

impl SubmissionPipeline {
    pub fn new(scorer: SimilarityScorer, policy: DecisionPolicy, max_document_bytes: usize) -> Self {
        Self {
            scorer,
            policy,
            max_document_bytes,
        }
    }

    /// Screen a document against a corpus without persisting anything.
    ///
    /// Candidate extraction failures and corpus listing failures are errors;
    /// individual corpus documents that fail are skipped inside the scan.
    pub async fn evaluate<C>(
        &self,
        document_id: i64,
        source: &SourceDocument,
        corpus: &C,
    ) -> Result<SubmissionOutcome>
    where
        C: CorpusSource + ?Sized,
    {
        source.ensure_within(self.max_document_bytes)?;

        let text = super::with_extracted_text(source, |text| text).await?;

        let snapshot = corpus
            .list_comparable(document_id)
            .await
            .context("Failed to load the comparison corpus")?;

        let similarity = self.scorer.score(&text, document_id, snapshot).await;
        let status = self.policy.decide(&similarity);

        info!(
            document_id,
            score = similarity.score,
            status = %status,
            partial = similarity.is_partial(),
            "Submission screened"
        );

        Ok(SubmissionOutcome::from_similarity(document_id, similarity, status))
    }

    /// Screen an already-persisted document and store the outcome.
    ///
    /// Screening failures do not propagate: the document is set to `pending`
    /// with any earlier score and matches cleared, and the returned outcome
    /// carries the failure. Only a failure to write to the database itself is
    /// returned as an error.
    pub async fn run(
        &self,
        db: &dyn Database,
        document_id: i64,
        source: &SourceDocument,
    ) -> Result<SubmissionOutcome> {
        match self.evaluate(document_id, source, db).await {
            Ok(outcome) => {
                db.record_analysis(
                    document_id,
                    outcome.score,
                    &outcome.details,
                    outcome.decided_status,
                )
                .await?;
                Ok(outcome)
            }
            Err(e) => {
                warn!(
                    document_id,
                    error = %format!("{e:#}"),
                    "Screening failed, leaving document pending"
                );
                db.record_analysis(document_id, 0.0, &[], DocumentStatus::Pending)
                    .await?;
                Ok(SubmissionOutcome::failed(document_id, format!("{e:#}")))
            }
        }
    }

    /// Re-screen a stored document from its persisted file.
    pub async fn recheck(&self, db: &dyn Database, document_id: i64) -> Result<SubmissionOutcome> {
        let source = db
            .get_document_file(document_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Document {document_id} not found"))?;
        self.run(db, document_id, &source).await
    }
}
