// Preview analysis: keyword, abstract and summary extraction over plain text.
//
// Everything here is a pure function of the input text. None of it fails:
// degenerate input (empty, symbols only) yields an empty result.

pub mod abstract_select;
pub mod keywords;
pub mod relevance;
pub mod summary;
