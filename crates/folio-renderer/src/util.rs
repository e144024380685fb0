//! Shared utility functions for markdown rendering.

use pulldown_cmark::HeadingLevel;

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Extract the language from a fenced code block info string.
///
/// The language is the first whitespace-separated word; a leading `{` or `.`
/// (as in `{.python}` attribute-style fences) is stripped.
pub(crate) fn fence_language(info: &str) -> Option<String> {
    let word = info.split_whitespace().next()?;
    let word = word.trim_start_matches('{').trim_end_matches('}');
    let word = word.trim_start_matches('.');
    if word.is_empty() {
        None
    } else {
        Some(word.to_owned())
    }
}
