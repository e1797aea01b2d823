// Extractive summary: score every sentence, keep the best five.
//
// A sentence's score depends only on its own position, length and wording,
// so removing one sentence never reorders the others relative to each other
// (apart from the position band shifting with the sentence count).
//
// The selected sentences are joined in score order, not document order.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Maximum number of sentences in a summary.
pub const MAX_SUMMARY_SENTENCES: usize = 5;

/// Words that suggest a sentence states a finding. Matched as substrings of
/// the lower-cased sentence, so "results" and "shows" count.
pub const SIGNAL_WORDS: [&str; 8] = [
    "conclusion",
    "result",
    "therefore",
    "thus",
    "show",
    "demonstrate",
    "find",
    "observe",
];

// Scores are kept in tenths so equal bonuses always compare equal.
const POSITION_BONUS: u32 = 3;
const LENGTH_BONUS: u32 = 3;
const SIGNAL_BONUS: u32 = 1;

/// A sentence is a run of non-terminal characters followed by a run of
/// terminal punctuation. Trailing text without punctuation is dropped.
static SENTENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("valid regex"));

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSentence {
    /// Position in the document's sentence sequence.
    pub index: usize,
    pub text: String,
    pub score: f64,
}

/// Split text into sentences, trimmed, in document order.
pub fn split_sentences(text: &str) -> Vec<&str> {
    raw_sentences(text).into_iter().map(str::trim).collect()
}

/// Sentence matches as found, including the whitespace that precedes them.
fn raw_sentences(text: &str) -> Vec<&str> {
    SENTENCE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Number of pieces a split on whitespace runs yields, edge pieces included.
///
/// Leading or trailing whitespace adds an empty piece, so " a b." counts 3.
/// Scoring runs on untrimmed sentences, so every sentence after the first
/// carries one extra piece from the gap before it.
fn word_count(sentence: &str) -> usize {
    let words = sentence.split_whitespace().count();
    let leading = usize::from(sentence.starts_with(char::is_whitespace));
    let trailing = usize::from(sentence.ends_with(char::is_whitespace));
    (words + leading + trailing).max(1)
}

/// Score a sentence at `index` in a document of `total` sentences.
///
/// `sentence` is taken as matched, before trimming.
pub fn sentence_score(sentence: &str, index: usize, total: usize) -> f64 {
    f64::from(score_tenths(sentence, index, total)) / 10.0
}

fn score_tenths(sentence: &str, index: usize, total: usize) -> u32 {
    let mut score = 0;

    // Leading and trailing sentences tend to carry motivation and conclusions
    let position = index as f64;
    let total = total as f64;
    if position < total * 0.2 || position > total * 0.8 {
        score += POSITION_BONUS;
    }

    let words = word_count(sentence);
    if words > 10 && words < 30 {
        score += LENGTH_BONUS;
    }

    let lowered = sentence.to_lowercase();
    let signals = SIGNAL_WORDS.iter().filter(|w| lowered.contains(*w)).count() as u32;
    score + signals * SIGNAL_BONUS
}

/// Every sentence with its score, sorted best first. Equal scores keep
/// document order.
pub fn rank_sentences(text: &str) -> Vec<ScoredSentence> {
    let sentences = raw_sentences(text);
    let total = sentences.len();

    let mut scored: Vec<(u32, ScoredSentence)> = sentences
        .into_iter()
        .enumerate()
        .map(|(index, sentence)| {
            let tenths = score_tenths(sentence, index, total);
            (
                tenths,
                ScoredSentence {
                    index,
                    text: sentence.trim().to_string(),
                    score: f64::from(tenths) / 10.0,
                },
            )
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, s)| s).collect()
}

/// Build the summary: the top five sentences joined by a single space, in
/// score order.
pub fn generate_summary(text: &str) -> String {
    rank_sentences(text)
        .into_iter()
        .take(MAX_SUMMARY_SENTENCES)
        .map(|s| s.text)
        .collect::<Vec<_>>()
        .join(" ")
}
