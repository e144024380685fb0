//! State structs tracking context while markdown events are rendered.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::{Alignment, CodeBlockKind};

use crate::html;
use crate::util::fence_language;

/// Buffered fenced or indented code block.
///
/// Text inside a code block is collected verbatim and written as one
/// `<pre><code>` element when the block closes.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    /// `Some` while a block is open; holds its language, if any.
    open: Option<Option<String>>,
    body: String,
}

impl CodeBlockState {
    /// Open a block. The language is the first word of a fence's info string.
    pub(crate) fn start(&mut self, kind: &CodeBlockKind<'_>) {
        let language = match kind {
            CodeBlockKind::Fenced(info) => fence_language(info),
            CodeBlockKind::Indented => None,
        };
        self.open = Some(language);
        self.body.clear();
    }

    /// Close the block and write it to `out`. No-op when no block is open.
    pub(crate) fn finish(&mut self, out: &mut String) {
        if let Some(language) = self.open.take() {
            html::code_block(language.as_deref(), &self.body, out);
            self.body.clear();
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.open.is_some()
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.body.push_str(text);
    }

    pub(crate) fn push_newline(&mut self) {
        self.body.push('\n');
    }
}

/// Table cell writer.
///
/// Header cells become `<th>`, body cells `<td>`; both carry the column's
/// alignment as inline `text-align`.
#[derive(Default)]
pub(crate) struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    column: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.column = 0;
    }

    /// Enter the header row (`<thead>` carries a single implicit row).
    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.column = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.column = 0;
    }

    /// Write the opening tag for the cell in the current column.
    pub(crate) fn open_cell(&self, out: &mut String) {
        out.push_str(if self.in_head { "<th" } else { "<td" });
        let align = match self.alignments.get(self.column) {
            Some(Alignment::Left) => "left",
            Some(Alignment::Center) => "center",
            Some(Alignment::Right) => "right",
            Some(Alignment::None) | None => "",
        };
        if !align.is_empty() {
            out.push_str(r#" style="text-align:"#);
            out.push_str(align);
            out.push('"');
        }
        out.push('>');
    }

    /// Write the closing tag for the current cell and move to the next column.
    pub(crate) fn close_cell(&mut self, out: &mut String) {
        out.push_str(if self.in_head { "</th>" } else { "</td>" });
        self.column += 1;
    }
}

/// State for capturing image alt text.
///
/// Only plain text inside the image label ends up in `alt`; inline
/// formatting markers are dropped.
#[derive(Default)]
pub(crate) struct ImageState {
    /// Nesting depth (an image label may itself contain an image).
    depth: usize,
    alt_text: String,
}

impl ImageState {
    pub(crate) fn start(&mut self) {
        if self.depth == 0 {
            self.alt_text.clear();
        }
        self.depth += 1;
    }

    /// End image capture and return the alt text once the outermost image closes.
    pub(crate) fn end(&mut self) -> Option<String> {
        self.depth = self.depth.saturating_sub(1);
        (self.depth == 0).then(|| std::mem::take(&mut self.alt_text))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.depth > 0
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Footnote numbering, in order of first reference or definition.
#[derive(Default)]
pub(crate) struct FootnoteState {
    numbers: HashMap<String, usize>,
}

impl FootnoteState {
    /// Number assigned to a footnote label, allocating the next one if new.
    pub(crate) fn number(&mut self, label: &str) -> usize {
        let next = self.numbers.len() + 1;
        *self.numbers.entry(label.to_owned()).or_insert(next)
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// A heading ready to be written out.
pub(crate) struct CompletedHeading {
    pub(crate) level: u8,
    pub(crate) id: String,
    pub(crate) classes: Vec<String>,
    pub(crate) html: String,
}

/// State for tracking headings, anchor IDs and title extraction.
pub(crate) struct HeadingState {
    /// Whether to extract title from first H1.
    extract_title: bool,
    /// Extracted title from first H1.
    title: Option<String>,
    /// Current heading level being processed (None if not in a heading).
    current_level: Option<u8>,
    /// Explicit `{#id}` given through heading attributes.
    explicit_id: Option<String>,
    /// Classes given through heading attributes.
    classes: Vec<String>,
    /// Buffer for heading plain text (for table of contents and slug).
    text: String,
    /// Buffer for heading HTML (with inline formatting).
    html: String,
    toc: Vec<TocEntry>,
    /// Next suffix to try for each generated base ID.
    id_counts: HashMap<String, usize>,
    /// Every ID written so far, explicit or generated.
    used_ids: HashSet<String>,
}

impl HeadingState {
    pub(crate) fn new(extract_title: bool) -> Self {
        Self {
            extract_title,
            title: None,
            current_level: None,
            explicit_id: None,
            classes: Vec::new(),
            text: String::new(),
            html: String::new(),
            toc: Vec::new(),
            id_counts: HashMap::new(),
            used_ids: HashSet::new(),
        }
    }

    /// Check if we're currently inside any heading.
    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    pub(crate) fn start_heading(
        &mut self,
        level: u8,
        explicit_id: Option<String>,
        classes: Vec<String>,
    ) {
        self.current_level = Some(level);
        self.explicit_id = explicit_id.filter(|id| !id.is_empty());
        self.classes = classes;
        self.text.clear();
        self.html.clear();
    }

    /// Complete heading and generate table of contents entry.
    pub(crate) fn complete_heading(&mut self) -> Option<CompletedHeading> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);

        let id = match self.explicit_id.take() {
            Some(id) => self.reserve_id(id),
            None => self.generate_id(&text),
        };

        // The title heading is still rendered but stays out of the ToC.
        let is_title = self.extract_title && level == 1 && self.title.is_none();
        if is_title {
            self.title = Some(text.trim().to_owned());
        } else {
            self.toc.push(TocEntry {
                level,
                title: text.trim().to_owned(),
                id: id.clone(),
            });
        }

        Some(CompletedHeading {
            level,
            id,
            classes: std::mem::take(&mut self.classes),
            html,
        })
    }

    /// Generate a unique ID for a heading.
    ///
    /// Suffixes count up per base slug and skip any ID already in use, so a
    /// second "FAQ" (`faq-1`) and a heading titled "FAQ 1" never share an ID.
    fn generate_id(&mut self, text: &str) -> String {
        let base_id = slugify(text);
        let base_id = if base_id.is_empty() {
            "section".to_owned()
        } else {
            base_id
        };
        let count = self.id_counts.entry(base_id.clone()).or_default();
        loop {
            let candidate = match *count {
                0 => base_id.clone(),
                n => format!("{base_id}-{n}"),
            };
            *count += 1;
            if self.used_ids.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Record an explicit ID so later generated IDs do not collide with it.
    fn reserve_id(&mut self, id: String) -> String {
        self.used_ids.insert(id.clone());
        id
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub(crate) fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// Convert heading text to a URL-safe anchor slug.
///
/// Converts to lowercase, replaces whitespace/dashes/underscores with single dashes,
/// and removes other non-alphanumeric characters.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("kebab-case"), "kebab-case");
        assert_eq!(slugify("snake_case"), "snake-case");
    }

    #[test]
    fn test_code_block_state() {
        let mut state = CodeBlockState::default();
        assert!(!state.is_active());

        state.start(&CodeBlockKind::Fenced("rust title=\"main.rs\"".into()));
        assert!(state.is_active());

        state.push_str("fn main() {}");
        let mut out = String::new();
        state.finish(&mut out);
        assert_eq!(
            out,
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
        assert!(!state.is_active());
    }

    #[test]
    fn test_code_block_state_indented() {
        let mut state = CodeBlockState::default();
        state.start(&CodeBlockKind::Indented);
        state.push_str("a < b");
        state.push_newline();
        let mut out = String::new();
        state.finish(&mut out);
        assert_eq!(out, "<pre><code>a &lt; b\n</code></pre>");

        let mut again = String::new();
        state.finish(&mut again);
        assert!(again.is_empty());
    }

    #[test]
    fn test_table_state() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::None, Alignment::Right]);

        let mut out = String::new();
        state.start_head();
        for text in ["a", "b", "c"] {
            state.open_cell(&mut out);
            out.push_str(text);
            state.close_cell(&mut out);
        }
        state.end_head();
        assert_eq!(
            out,
            r#"<th style="text-align:left">a</th><th>b</th><th style="text-align:right">c</th>"#
        );

        out.clear();
        state.start_row();
        state.open_cell(&mut out);
        state.close_cell(&mut out);
        state.open_cell(&mut out);
        state.close_cell(&mut out);
        state.open_cell(&mut out);
        state.close_cell(&mut out);
        state.open_cell(&mut out);
        assert_eq!(
            out,
            r#"<td style="text-align:left"></td><td></td><td style="text-align:right"></td><td>"#
        );
    }

    #[test]
    fn test_image_state() {
        let mut state = ImageState::default();
        assert!(!state.is_active());

        state.start();
        assert!(state.is_active());

        state.push_str("alt text");
        assert_eq!(state.end(), Some("alt text".to_owned()));
        assert!(!state.is_active());
    }

    #[test]
    fn test_image_state_nested() {
        let mut state = ImageState::default();
        state.start();
        state.push_str("outer ");
        state.start();
        state.push_str("inner");
        assert_eq!(state.end(), None);
        assert!(state.is_active());
        assert_eq!(state.end(), Some("outer inner".to_owned()));
    }

    #[test]
    fn test_footnote_numbering() {
        let mut state = FootnoteState::default();
        assert_eq!(state.number("a"), 1);
        assert_eq!(state.number("b"), 2);
        assert_eq!(state.number("a"), 1);
        assert_eq!(state.number("c"), 3);
    }

    #[test]
    fn test_heading_state_title_extraction() {
        let mut state = HeadingState::new(true);

        state.start_heading(1, None, Vec::new());
        state.push_text("My Title");
        let heading = state.complete_heading().unwrap();
        assert_eq!(heading.level, 1);
        assert_eq!(heading.id, "my-title");

        state.start_heading(2, None, Vec::new());
        state.push_text("Section");
        let heading = state.complete_heading().unwrap();
        assert_eq!(heading.level, 2);

        assert_eq!(state.take_title(), Some("My Title".to_owned()));
        assert_eq!(state.take_toc().len(), 1);
    }

    #[test]
    fn test_heading_state_explicit_id_reserved() {
        let mut state = HeadingState::new(false);

        state.start_heading(2, Some("intro".to_owned()), vec!["lead".to_owned()]);
        state.push_text("Something else");
        let heading = state.complete_heading().unwrap();
        assert_eq!(heading.id, "intro");
        assert_eq!(heading.classes, vec!["lead"]);

        state.start_heading(2, None, Vec::new());
        state.push_text("Intro");
        let heading = state.complete_heading().unwrap();
        assert_eq!(heading.id, "intro-1");
    }

    #[test]
    fn test_heading_state_suffix_skips_used_ids() {
        let mut state = HeadingState::new(false);
        let mut ids = Vec::new();
        for text in ["FAQ", "FAQ", "FAQ 1", "FAQ"] {
            state.start_heading(2, None, Vec::new());
            state.push_text(text);
            ids.push(state.complete_heading().unwrap().id);
        }
        assert_eq!(ids, vec!["faq", "faq-1", "faq-1-1", "faq-2"]);
    }

    #[test]
    fn test_heading_state_generated_avoids_explicit_suffixed_id() {
        let mut state = HeadingState::new(false);
        state.start_heading(2, Some("faq-1".to_owned()), Vec::new());
        state.push_text("Pinned");
        state.complete_heading().unwrap();

        let mut ids = Vec::new();
        for _ in 0..2 {
            state.start_heading(2, None, Vec::new());
            state.push_text("FAQ");
            ids.push(state.complete_heading().unwrap().id);
        }
        assert_eq!(ids, vec!["faq", "faq-2"]);
    }

    #[test]
    fn test_heading_state_empty_text_gets_fallback_id() {
        let mut state = HeadingState::new(false);
        state.start_heading(3, None, Vec::new());
        state.push_text("???");
        assert_eq!(state.complete_heading().unwrap().id, "section");
    }
}
