//! Markdown renderer producing HTML fragments from `pulldown-cmark` events.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::html;
use crate::state::{
    CodeBlockState, FootnoteState, HeadingState, ImageState, TableState, TocEntry,
};
use crate::util::heading_level_to_num;

/// Result of rendering markdown.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// Title extracted from first H1 heading (if `extract_title` was enabled).
    pub title: Option<String>,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
}

/// Markdown renderer.
///
/// Walks the parser's event stream once and writes HTML into an internal
/// buffer. Rendering never fails: markup the parser does not recognize comes
/// out as literal text.
///
/// # Example
///
/// ```
/// use folio_renderer::MarkdownRenderer;
///
/// let result = MarkdownRenderer::new()
///     .with_title_extraction()
///     .render_markdown("# Hello\n\n**Bold** text");
/// assert_eq!(result.title.as_deref(), Some("Hello"));
/// assert!(result.html.contains("<strong>Bold</strong>"));
/// ```
pub struct MarkdownRenderer {
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    footnotes: FootnoteState,
    pending_images: Vec<(String, String)>,
    extended: bool,
}

impl MarkdownRenderer {
    /// Create a new renderer with the extended profile enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::new(false),
            footnotes: FootnoteState::default(),
            pending_images: Vec::new(),
            extended: true,
        }
    }

    /// Enable title extraction from first H1 heading.
    ///
    /// The H1 is still rendered but is left out of the table of contents.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.heading = HeadingState::new(true);
        self
    }

    /// Enable or disable the extended markup profile.
    ///
    /// Enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Footnotes (`[^label]`)
    /// - Definition lists
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    /// - Heading attributes (`## Title {#id .class}`)
    #[must_use]
    pub fn with_extended(mut self, enabled: bool) -> Self {
        self.extended = enabled;
        self
    }

    /// Get parser options for the configured profile.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.extended {
            Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_HEADING_ATTRIBUTES
                | Options::ENABLE_DEFINITION_LIST
        } else {
            Options::empty()
        }
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text using the configured parser options.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        self.render(self.create_parser(markdown))
    }

    /// Render markdown events and return the result.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }

        RenderResult {
            html: std::mem::take(&mut self.output),
            title: self.heading.take_title(),
            toc: self.heading.take_toc(),
        }
    }

    /// Push content to output or heading buffer based on context.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.hard_break(),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => html::task_list_marker(checked, &mut self.output),
            Event::FootnoteReference(label) => self.footnote_reference(&label),
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                // Math parsing is never enabled; keep the source visible.
                self.text(&math);
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("<p>");
                }
            }
            Tag::Heading {
                level, id, classes, ..
            } => {
                // Opening tag is written in end_tag once the ID is known.
                self.heading.start_heading(
                    heading_level_to_num(level),
                    id.map(|id| id.to_string()),
                    classes.iter().map(ToString::to_string).collect(),
                );
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => self.code.start(&kind),
            Tag::List(start) => {
                match start {
                    Some(1) => self.output.push_str("<ol>"),
                    Some(n) => self.output.push_str(&format!(r#"<ol start="{n}">"#)),
                    None => self.output.push_str("<ul>"),
                }
            }
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(label) => {
                let number = self.footnotes.number(&label);
                html::footnote_definition_start(&label, number, &mut self.output);
            }
            Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => self.table.open_cell(&mut self.output),
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                if !self.image.is_active() {
                    let link_tag = html::link_start(&dest_url, &title);
                    self.push_inline(&link_tag);
                }
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Start collecting alt text; the image is written in end_tag
                self.image.start();
                self.pending_images
                    .push((dest_url.to_string(), title.to_string()));
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("</p>");
                }
            }
            TagEnd::Heading(_level) => {
                if let Some(heading) = self.heading.complete_heading() {
                    html::heading(
                        heading.level,
                        &heading.id,
                        &heading.classes,
                        &heading.html,
                        &mut self.output,
                    );
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => self.code.finish(&mut self.output),
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition => self.output.push_str("</div>"),
            TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::Image => self.end_image(),
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => self.table.close_cell(&mut self.output),
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => {
                if !self.image.is_active() {
                    self.push_inline("</a>");
                }
            }
        }
    }

    /// Write the image once the outermost image label closes.
    ///
    /// Images nested inside another image's label only contribute alt text.
    fn end_image(&mut self) {
        let pending = self.pending_images.pop();
        let Some(alt) = self.image.end() else {
            return;
        };
        if let Some((src, title)) = pending {
            let mut tag = String::new();
            html::image(&src, &alt, &title, &mut tag);
            self.push_inline(&tag);
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            let mut escaped = String::new();
            html::escape_text(text, &mut escaped);
            self.heading.push_html(&escaped);
        } else {
            html::escape_text(text, &mut self.output);
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
            return;
        }
        let mut tag = String::from("<code>");
        html::escape_text(code, &mut tag);
        tag.push_str("</code>");
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        self.push_inline(&tag);
    }

    fn raw_html(&mut self, html: &str) {
        if self.image.is_active() {
            return;
        }
        self.push_inline(html);
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else if self.image.is_active() {
            self.image.push_str(" ");
        } else if self.heading.is_active() {
            self.heading.push_text(" ");
            self.heading.push_html(" ");
        } else {
            self.output.push('\n');
        }
    }

    fn hard_break(&mut self) {
        if self.image.is_active() {
            self.image.push_str(" ");
        } else {
            self.push_inline("<br>");
        }
    }

    fn footnote_reference(&mut self, label: &str) {
        let number = self.footnotes.number(label);
        let mut tag = String::new();
        html::footnote_reference(label, number, &mut tag);
        self.push_inline(&tag);
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
