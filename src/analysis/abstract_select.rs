// Abstract selection: pick the paragraph most likely to be the abstract.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Paragraph length bounds (exclusive, in characters) for the fallback pick.
const MIN_ABSTRACT_CHARS: usize = 100;
const MAX_ABSTRACT_CHARS: usize = 2000;

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\n+").expect("valid regex"));

/// Split text into paragraphs on runs of two or more newlines.
pub fn paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK.split(text).collect()
}

/// Select the abstract candidate.
///
/// The first paragraph mentioning "abstract" wins regardless of length.
/// Failing that, the first paragraph of plausible length that is not the
/// introduction. Failing that, the first paragraph. An empty string means no
/// abstract was found; it is not an error.
pub fn select_abstract(text: &str) -> String {
    let paragraphs = paragraphs(text);

    let labelled = paragraphs
        .iter()
        .find(|p| p.to_lowercase().contains("abstract"));
    if let Some(p) = labelled {
        return p.to_string();
    }

    let plausible = paragraphs.iter().find(|p| {
        let len = p.chars().count();
        len > MIN_ABSTRACT_CHARS
            && len < MAX_ABSTRACT_CHARS
            && !p.to_lowercase().contains("introduction")
    });
    if let Some(p) = plausible {
        return p.to_string();
    }

    paragraphs.first().map(|p| p.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_paragraph(prefix: &str) -> String {
        format!("{prefix} {}", "word ".repeat(40)).trim().to_string()
    }

    #[test]
    fn test_labelled_paragraph_wins_even_if_short() {
        let body = long_paragraph("Body");
        let text = format!("{body}\n\nAbstract: short.");
        assert_eq!(select_abstract(&text), "Abstract: short.");
    }

    #[test]
    fn test_label_match_is_case_insensitive() {
        let text = "Title\n\nABSTRACT\nWe study things.\n\nMore";
        assert_eq!(select_abstract(text), "ABSTRACT\nWe study things.");
    }

    #[test]
    fn test_falls_back_to_plausible_length() {
        let intro = long_paragraph("Introduction");
        let body = long_paragraph("Methods");
        let text = format!("Short title\n\n{intro}\n\n{body}");
        assert_eq!(select_abstract(&text), body);
    }

    #[test]
    fn test_length_bounds_are_exclusive() {
        let exactly_100 = "x".repeat(100);
        let text = format!("Title\n\n{exactly_100}");
        assert_eq!(select_abstract(&text), "Title");

        let just_over = "x".repeat(101);
        let text = format!("Title\n\n{just_over}");
        assert_eq!(select_abstract(&text), just_over);
    }

    #[test]
    fn test_falls_back_to_first_paragraph() {
        assert_eq!(select_abstract("One\n\nTwo\n\n\nThree"), "One");
    }

    #[test]
    fn test_empty_text_yields_empty() {
        assert_eq!(select_abstract(""), "");
    }

    #[test]
    fn test_single_newline_does_not_split() {
        assert_eq!(paragraphs("a\nb\n\nc"), vec!["a\nb", "c"]);
    }
}
