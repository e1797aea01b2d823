// Sørensen–Dice coefficient over character bigrams.
//
// Whitespace is removed first, so layout differences between a PDF and a
// DOCX rendering of the same text do not count against the match. Bigrams
// are matched as a multiset: each bigram in `b` consumes at most one
// occurrence from `a`.
//
//   dice = 2 * |shared bigrams| / (|bigrams(a)| + |bigrams(b)|)

use std::collections::HashMap;

use super::traits::SimilarityMetric;

/// The default lexical metric.
#[derive(Debug, Default, Clone, Copy)]
pub struct BigramDice;

impl SimilarityMetric for BigramDice {
    fn name(&self) -> &'static str {
        "bigram-dice"
    }

    fn similarity(&self, a: &str, b: &str) -> f64 {
        dice_coefficient(a, b)
    }
}

pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::with_capacity(a.len());
    for pair in a.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut shared = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    (2 * shared) as f64 / (a.len() + b.len() - 2) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_is_one() {
        let text = "The quick brown fox jumps over the lazy dog.";
        assert!((dice_coefficient(text, text) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert!((dice_coefficient("a b c d", "abcd") - 1.0).abs() < f64::EPSILON);
        assert!((dice_coefficient("", "   ") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_disjoint_is_zero() {
        assert_eq!(dice_coefficient("abcdef", "uvwxyz"), 0.0);
    }

    #[test]
    fn test_known_value() {
        // he ea al le ed vs se ea al le ed: 4 shared of 5 + 5
        assert!((dice_coefficient("healed", "sealed") - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_bigrams_match_once_each() {
        // aa aa aa (3) vs aa (1): one shared, 2 * 1 / 4
        assert!((dice_coefficient("aaaa", "aa") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_too_short_is_zero() {
        assert_eq!(dice_coefficient("a", "ab"), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = "lexical similarity of documents";
        let b = "semantic similarity between two documents";
        assert!((dice_coefficient(a, b) - dice_coefficient(b, a)).abs() < 1e-12);
    }

    #[test]
    fn test_trait_delegates() {
        let metric = BigramDice;
        assert_eq!(metric.name(), "bigram-dice");
        assert!((metric.similarity("healed", "sealed") - 0.8).abs() < 1e-9);
    }
}
