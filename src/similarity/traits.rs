// Similarity metric trait: swap-ready abstraction.
//
// Like the corpus source, this keeps the heuristic replaceable. Metrics are
// synchronous and CPU-bound; the scorer runs them on the blocking pool.

/// A symmetric text similarity in [0, 1]: 1.0 identical, 0.0 disjoint.
pub trait SimilarityMetric: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    fn similarity(&self, a: &str, b: &str) -> f64;
}
