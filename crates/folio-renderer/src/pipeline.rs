//! Two-stage rendering: markup to HTML, then image figures.

use std::time::Instant;

use crate::figure::{FigureEnricher, FigureOptions};
use crate::renderer::MarkdownRenderer;
use crate::state::TocEntry;

/// Pipeline configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Enable the extended markup profile (tables, footnotes, definition lists, ...).
    pub extended: bool,
    /// Pull the first H1 out as the page title.
    pub extract_title: bool,
    /// Figure generation settings.
    pub figures: FigureOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            extended: true,
            extract_title: false,
            figures: FigureOptions::default(),
        }
    }
}

/// A fully rendered page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderedPage {
    /// HTML fragment with images already wrapped in figures.
    pub html: String,
    /// Title from the first H1, when title extraction is enabled.
    pub title: Option<String>,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
    /// Number of figures generated.
    pub figures: usize,
}

/// Markup rendering pipeline.
///
/// Holds only configuration. Every call builds a fresh renderer, so one
/// pipeline can be shared across threads and used for any number of pages.
///
/// # Example
///
/// ```
/// use folio_renderer::{RenderOptions, RenderPipeline};
///
/// let pipeline = RenderPipeline::new(RenderOptions::default());
/// let page = pipeline.render_page(Some("![Map|align=left](/img/map.png)"));
/// assert_eq!(page.figures, 1);
/// assert!(page.html.contains("float:left"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RenderPipeline {
    options: RenderOptions,
    enricher: FigureEnricher,
}

impl RenderPipeline {
    /// Create a pipeline with the given options.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        let enricher = FigureEnricher::new(options.figures.clone());
        Self { options, enricher }
    }

    /// Options in use.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render stored page content. Missing content renders as an empty page.
    #[must_use]
    pub fn render_page(&self, content: Option<&str>) -> RenderedPage {
        let content = content.unwrap_or_default();
        let start = Instant::now();

        let mut renderer = MarkdownRenderer::new().with_extended(self.options.extended);
        if self.options.extract_title {
            renderer = renderer.with_title_extraction();
        }
        let result = renderer.render_markdown(content);
        let (html, figures) = self.enricher.enrich_counted(&result.html);

        tracing::debug!(
            input_bytes = content.len(),
            output_bytes = html.len(),
            figures,
            elapsed_us = start.elapsed().as_micros(),
            "Rendered page"
        );

        RenderedPage {
            html,
            title: result.title,
            toc: result.toc,
            figures,
        }
    }

    /// Render content and return only the HTML.
    #[must_use]
    pub fn render_html(&self, content: &str) -> String {
        self.render_page(Some(content)).html
    }
}
