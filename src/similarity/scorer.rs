// Similarity scorer: fan out across the corpus, fan in to the best match.
//
// Each corpus document is extracted and compared on the blocking pool, with
// up to `concurrency` comparisons in flight. Results are consumed in corpus
// order (`buffered`, not `buffer_unordered`) so the detail list keeps the
// order the corpus supplied.
//
// Failure handling:
// - a corpus document that fails to extract is skipped and logged
// - a comparison that exceeds its timeout is skipped and marks the scan partial
// - when the whole-scan deadline passes, the scan stops and returns what it
//   has so far, marked partial
//
// A timed-out blocking task cannot be cancelled; it finishes in the
// background and its result is discarded.

use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{info, warn};

use super::traits::SimilarityMetric;
use crate::corpus::CorpusDocument;
use crate::error::{AnalysisError, AnalysisResult};
use crate::extract;

/// Number of characters of the matched text kept as a preview.
pub const PREVIEW_CHARS: usize = 200;

/// Tunables for one similarity scan.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Matches at or below this percentage are not reported.
    pub report_threshold: f64,
    /// Maximum comparisons in flight at once.
    pub concurrency: usize,
    pub comparison_timeout: Duration,
    pub scan_timeout: Duration,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            report_threshold: 10.0,
            concurrency: 4,
            comparison_timeout: Duration::from_secs(30),
            scan_timeout: Duration::from_secs(300),
        }
    }
}

/// One corpus document that matched above the reporting threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub matched_document_id: i64,
    /// 0.0 to 100.0
    pub match_percentage: f64,
    /// The first 200 characters of the matched document, plus "...".
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    ExtractionFailed(String),
    TimedOut,
    WorkerFailed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ExtractionFailed(e) => write!(f, "extraction failed: {e}"),
            SkipReason::TimedOut => write!(f, "comparison timed out"),
            SkipReason::WorkerFailed(e) => write!(f, "comparison worker failed: {e}"),
        }
    }
}

/// A corpus document that was not compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedComparison {
    pub document_id: i64,
    pub reason: SkipReason,
}

/// Whether every comparable document had a chance to be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completeness {
    Complete,
    /// A comparison or the whole scan ran out of time.
    Partial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Highest reported match percentage, or 0 when nothing was reported.
    pub score: f64,
    /// Reported matches in corpus order.
    pub details: Vec<MatchDetail>,
    /// Documents compared successfully (reported or not).
    pub compared: usize,
    pub skipped: Vec<SkippedComparison>,
    /// Documents never started because the scan deadline passed.
    pub unscanned: usize,
    pub completeness: Completeness,
}

impl SimilarityResult {
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            details: Vec::new(),
            compared: 0,
            skipped: Vec::new(),
            unscanned: 0,
            completeness: Completeness::Complete,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.completeness == Completeness::Partial
    }

    fn record_match(&mut self, detail: MatchDetail) {
        if detail.match_percentage > self.score {
            self.score = detail.match_percentage;
        }
        self.details.push(detail);
    }
}

/// Result of comparing the candidate with one corpus document.
struct Comparison {
    document_id: i64,
    percentage: f64,
    preview: String,
}

enum Outcome {
    Compared(Comparison),
    Skipped(SkippedComparison),
}

/// Scores a candidate text against a corpus snapshot with a pluggable metric.
#[derive(Clone)]
pub struct SimilarityScorer {
    metric: Arc<dyn SimilarityMetric>,
    settings: ScanSettings,
}

impl SimilarityScorer {
    pub fn new(metric: Arc<dyn SimilarityMetric>, settings: ScanSettings) -> Self {
        Self { metric, settings }
    }

    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    /// Compare `candidate_text` with every corpus document other than
    /// `candidate_id`.
    ///
    /// Never fails: per-document problems become `skipped` entries and
    /// deadline overruns become a `Partial` result.
    pub async fn score(
        &self,
        candidate_text: &str,
        candidate_id: i64,
        corpus: Vec<CorpusDocument>,
    ) -> SimilarityResult {
        let comparable: Vec<CorpusDocument> = corpus
            .into_iter()
            .filter(|d| d.id != candidate_id)
            .collect();
        let total = comparable.len();

        let mut result = SimilarityResult::empty();
        if total == 0 {
            return result;
        }

        let candidate: Arc<str> = Arc::from(candidate_text);
        let comparison_timeout = self.settings.comparison_timeout;
        let deadline = Instant::now() + self.settings.scan_timeout;

        let outcomes = stream::iter(comparable.into_iter().map(|document| {
            let candidate = Arc::clone(&candidate);
            let metric = Arc::clone(&self.metric);
            async move { compare_with_timeout(candidate, document, metric, comparison_timeout).await }
        }))
        .buffered(self.settings.concurrency.max(1));
        let mut outcomes = pin!(outcomes);

        loop {
            match tokio::time::timeout_at(deadline, outcomes.next()).await {
                Ok(Some(Outcome::Compared(comparison))) => {
                    result.compared += 1;
                    if comparison.percentage > self.settings.report_threshold {
                        result.record_match(MatchDetail {
                            matched_document_id: comparison.document_id,
                            match_percentage: comparison.percentage,
                            preview: comparison.preview,
                        });
                    }
                }
                Ok(Some(Outcome::Skipped(skipped))) => {
                    warn!(
                        document_id = skipped.document_id,
                        reason = %skipped.reason,
                        "Skipping corpus document"
                    );
                    if skipped.reason == SkipReason::TimedOut {
                        result.completeness = Completeness::Partial;
                    }
                    result.skipped.push(skipped);
                }
                Ok(None) => break,
                Err(_) => {
                    result.unscanned = total - result.compared - result.skipped.len();
                    result.completeness = Completeness::Partial;
                    warn!(
                        unscanned = result.unscanned,
                        timeout_secs = self.settings.scan_timeout.as_secs(),
                        "Similarity scan deadline reached, returning partial result"
                    );
                    break;
                }
            }
        }

        info!(
            metric = self.metric.name(),
            score = result.score,
            compared = result.compared,
            reported = result.details.len(),
            skipped = result.skipped.len(),
            partial = result.is_partial(),
            "Similarity scan finished"
        );

        result
    }
}

async fn compare_with_timeout(
    candidate: Arc<str>,
    document: CorpusDocument,
    metric: Arc<dyn SimilarityMetric>,
    timeout: Duration,
) -> Outcome {
    let document_id = document.id;
    let task =
        tokio::task::spawn_blocking(move || compare_document(&candidate, &document, metric.as_ref()));

    let reason = match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(comparison))) => return Outcome::Compared(comparison),
        Ok(Ok(Err(e))) => SkipReason::ExtractionFailed(e.to_string()),
        Ok(Err(join_error)) => SkipReason::WorkerFailed(join_error.to_string()),
        Err(_) => SkipReason::TimedOut,
    };

    Outcome::Skipped(SkippedComparison {
        document_id,
        reason,
    })
}

/// Extract one corpus document and measure it against the candidate.
fn compare_document(
    candidate: &str,
    document: &CorpusDocument,
    metric: &dyn SimilarityMetric,
) -> AnalysisResult<Comparison> {
    let text = extract::extract(&document.file_bytes, &document.content_type).map_err(|e| {
        AnalysisError::ComparisonExtractionFailed {
            document_id: document.id,
            reason: e.to_string(),
        }
    })?;

    let percentage = metric.similarity(candidate, &text) * 100.0;
    Ok(Comparison {
        document_id: document.id,
        percentage,
        preview: preview_of(&text),
    })
}

/// First `PREVIEW_CHARS` characters followed by an ellipsis.
pub fn preview_of(text: &str) -> String {
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_always_has_ellipsis() {
        assert_eq!(preview_of("short"), "short...");
        let long = "é".repeat(300);
        let preview = preview_of(&long);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_record_match_tracks_max() {
        let mut result = SimilarityResult::empty();
        for (id, pct) in [(1, 40.0), (2, 80.0), (3, 20.0)] {
            result.record_match(MatchDetail {
                matched_document_id: id,
                match_percentage: pct,
                preview: String::new(),
            });
        }
        assert_eq!(result.score, 80.0);
        let ids: Vec<i64> = result.details.iter().map(|d| d.matched_document_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_corpus() {
        let scorer = SimilarityScorer::new(
            Arc::new(crate::similarity::dice::BigramDice),
            ScanSettings::default(),
        );
        let result = scorer.score("anything", 1, Vec::new()).await;
        assert_eq!(result, SimilarityResult::empty());
    }

    #[tokio::test]
    async fn test_unreadable_document_is_skipped() {
        let scorer = SimilarityScorer::new(
            Arc::new(crate::similarity::dice::BigramDice),
            ScanSettings::default(),
        );
        let corpus = vec![CorpusDocument {
            id: 7,
            file_bytes: b"not a pdf".to_vec(),
            content_type: extract::PDF_MIME.to_string(),
        }];
        let result = scorer.score("candidate", 1, corpus).await;
        assert_eq!(result.score, 0.0);
        assert_eq!(result.compared, 0);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].document_id, 7);
        assert!(matches!(result.skipped[0].reason, SkipReason::ExtractionFailed(_)));
        assert_eq!(result.completeness, Completeness::Complete);
    }
}
