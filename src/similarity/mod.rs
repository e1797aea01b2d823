// Corpus similarity: compare a candidate text against approved documents.
//
// The metric sits behind the SimilarityMetric trait so the lexical default
// (bigram Dice) can be replaced by shingling or embeddings without touching
// the scorer or the submission pipeline.

pub mod dice;
pub mod scorer;
pub mod traits;

pub use scorer::{
    Completeness, MatchDetail, ScanSettings, SimilarityResult, SimilarityScorer, SkipReason,
    SkippedComparison,
};
pub use traits::SimilarityMetric;
