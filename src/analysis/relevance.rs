// Search relevance: weighted term hits across title, keywords and abstract.

const TITLE_WEIGHT: u32 = 10;
const KEYWORD_WEIGHT: u32 = 5;
const ABSTRACT_WEIGHT: u32 = 3;

/// Score how well a document's metadata matches a free-text query.
///
/// The query is lower-cased and split on single spaces. Each term adds the
/// title weight if the title contains it, the keyword weight if any keyword
/// contains it, and the abstract weight if the abstract contains it.
pub fn relevance_score(title: &str, keywords: &[String], abstract_text: &str, query: &str) -> u32 {
    if query.is_empty() {
        return 0;
    }

    let title = title.to_lowercase();
    let abstract_text = abstract_text.to_lowercase();
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let query = query.to_lowercase();
    let mut score = 0;
    for term in query.split(' ').filter(|t| !t.is_empty()) {
        if title.contains(term) {
            score += TITLE_WEIGHT;
        }
        if keywords.iter().any(|k| k.contains(term)) {
            score += KEYWORD_WEIGHT;
        }
        if abstract_text.contains(term) {
            score += ABSTRACT_WEIGHT;
        }
    }
    score
}
