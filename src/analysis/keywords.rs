// Frequency-ranked keyword extraction.
//
// Tokens are counted in an insertion-ordered table so that equal frequencies
// rank by first occurrence in the text. That tie-break is part of the
// contract: a hash map would make the ranking depend on iteration order.

use std::collections::HashMap;

/// Maximum number of keywords returned.
pub const MAX_KEYWORDS: usize = 10;

/// Tokens of this many characters or fewer are never keywords.
const MIN_TOKEN_LEN: usize = 3;

/// Common English words excluded from keyword ranking.
pub const STOP_WORDS: [&str; 50] = [
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i",
    "it", "for", "not", "on", "with", "he", "as", "you", "do", "at",
    "this", "but", "his", "by", "from", "they", "we", "say", "her", "she",
    "or", "an", "will", "my", "one", "all", "would", "there", "their", "what",
    "so", "up", "out", "if", "about", "who", "get", "which", "go", "me",
];

/// Word characters are ASCII letters, digits and underscore; whitespace is
/// any Unicode whitespace. Everything else is stripped before splitting.
fn is_kept(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace()
}

/// Frequency table that remembers the order in which tokens first appeared.
#[derive(Debug, Default)]
struct FrequencyTable {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    fn add(&mut self, token: &str) {
        match self.counts.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.order.push(token.to_string());
                self.counts.insert(token.to_string(), 1);
            }
        }
    }

    /// Entries sorted by descending count; ties keep first-seen order.
    fn ranked(self) -> Vec<(String, usize)> {
        let FrequencyTable { order, counts } = self;
        let mut entries: Vec<(String, usize)> = order
            .into_iter()
            .map(|token| {
                let count = counts.get(&token).copied().unwrap_or(0);
                (token, count)
            })
            .collect();
        // sort_by is stable, so first-seen order survives among equal counts
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

/// Extract up to ten distinctive terms, most frequent first.
pub fn extract_keywords(text: &str) -> Vec<String> {
    ranked_terms(text)
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(token, _)| token)
        .collect()
}

/// Every qualifying token with its frequency, in ranking order.
pub fn ranked_terms(text: &str) -> Vec<(String, usize)> {
    let lowered = text.to_lowercase();
    let cleaned: String = lowered.chars().filter(|c| is_kept(*c)).collect();

    let mut table = FrequencyTable::default();
    for token in cleaned.split_whitespace() {
        if is_candidate(token) {
            table.add(token);
        }
    }
    table.ranked()
}

fn is_candidate(token: &str) -> bool {
    token.chars().count() > MIN_TOKEN_LEN && !STOP_WORDS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_by_frequency() {
        let text = "graph graph graph neural neural network";
        assert_eq!(extract_keywords(text), vec!["graph", "neural", "network"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let text = "zebra apple mango apple zebra mango";
        assert_eq!(extract_keywords(text), vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_filters_short_tokens_and_stop_words() {
        // "about", "would", "there", "their", "which" are stop words longer than 3
        let text = "about would there their which cat dog the data";
        assert_eq!(extract_keywords(text), vec!["data"]);
    }

    #[test]
    fn test_strips_punctuation_before_length_check() {
        // "it's" loses the apostrophe and becomes "its" (3 chars, dropped)
        let text = "It's model-based: models, MODELS!";
        assert_eq!(extract_keywords(text), vec!["models", "modelbased"]);
    }

    #[test]
    fn test_unicode_whitespace_separates_tokens() {
        assert_eq!(
            extract_keywords("alpha\u{00A0}beta gamma"),
            vec!["alpha", "beta", "gamma"]
        );
        assert_eq!(
            extract_keywords("delta\u{2003}epsilon\u{3000}delta"),
            vec!["delta", "epsilon"]
        );
    }

    #[test]
    fn test_non_ascii_letters_are_stripped() {
        // "naïve" loses the diaeresis and becomes "nave"
        assert_eq!(extract_keywords("naïve café résumé"), vec!["nave", "rsum"]);
    }

    #[test]
    fn test_caps_at_ten() {
        let text = (0..15)
            .map(|i| format!("token{i:02}"))
            .collect::<Vec<_>>()
            .join(" ");
        let keywords = extract_keywords(&text);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        assert_eq!(keywords[0], "token00");
        assert_eq!(keywords[9], "token09");
    }

    #[test]
    fn test_symbols_only_is_empty() {
        assert!(extract_keywords("!!! ??? ... --- ###").is_empty());
        assert!(extract_keywords("").is_empty());
    }

    #[test]
    fn test_ranked_terms_counts() {
        let ranked = ranked_terms("Data data DATA science");
        assert_eq!(ranked, vec![("data".to_string(), 3), ("science".to_string(), 1)]);
    }
}
