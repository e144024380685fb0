//! URL slugs for page titles.
//!
//! Slugs are plain ASCII: diacritics are stripped through compatibility
//! decomposition, punctuation is dropped and words are joined with `+`.
//! Collisions get a numeric suffix starting at `-2`.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s]+").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// First numeric suffix tried after the bare slug is taken.
const FIRST_SUFFIX: u32 = 2;

/// Strip diacritics and drop every character without an ASCII equivalent.
fn to_ascii(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// Build the base slug for a title.
///
/// Returns `fallback` when the title has no letters or digits left after
/// transliteration.
///
/// # Example
///
/// ```
/// use folio_pages::slugify_title;
///
/// assert_eq!(slugify_title("Lehotský drak: Príbeh", "page"), "lehotsky+drak+pribeh");
/// assert_eq!(slugify_title("???", "page"), "page");
/// ```
#[must_use]
pub fn slugify_title(title: &str, fallback: &str) -> String {
    let ascii = to_ascii(title);
    let cleaned = DISALLOWED_RE.replace_all(&ascii, "");
    let collapsed = WHITESPACE_RE.replace_all(&cleaned, " ");
    let base = collapsed.trim();

    if base.is_empty() {
        fallback.to_owned()
    } else {
        base.replace(' ', "+").to_ascii_lowercase()
    }
}

/// Build a slug for `title` that `is_taken` does not report as used.
///
/// Candidates are the base slug, then `base-2`, `base-3`, and so on. The
/// predicate is the caller's lookup against stored pages; when editing an
/// existing page it should ignore that page's own slug.
#[must_use]
pub fn unique_slug(title: &str, fallback: &str, mut is_taken: impl FnMut(&str) -> bool) -> String {
    let base = slugify_title(title, fallback);
    if !is_taken(&base) {
        return base;
    }

    let mut suffix = FIRST_SUFFIX;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !is_taken(&candidate) {
            tracing::debug!(slug = %candidate, attempts = suffix, "Resolved slug collision");
            return candidate;
        }
        suffix += 1;
    }
}

/// Slug builder carrying the configured fallback.
#[derive(Clone, Debug)]
pub struct SlugGenerator {
    fallback: String,
}

impl SlugGenerator {
    /// Create a generator with the given fallback slug.
    #[must_use]
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }

    /// Fallback slug in use.
    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Base slug for a title.
    #[must_use]
    pub fn slugify(&self, title: &str) -> String {
        slugify_title(title, &self.fallback)
    }

    /// Collision-free slug for a title.
    #[must_use]
    pub fn unique(&self, title: &str, is_taken: impl FnMut(&str) -> bool) -> String {
        unique_slug(title, &self.fallback, is_taken)
    }
}

impl Default for SlugGenerator {
    fn default() -> Self {
        Self::new("page")
    }
}
