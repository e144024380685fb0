//! Markup to HTML rendering with image figures.
//!
//! Page content is written in Markdown. Rendering happens in two stages:
//!
//! 1. [`MarkdownRenderer`] walks `pulldown-cmark` events and writes an HTML
//!    fragment (extended profile: tables, footnotes, definition lists,
//!    strikethrough, task lists, heading attributes).
//! 2. [`FigureEnricher`] rewrites every `<img>` in that fragment into a styled
//!    `<figure>`, reading layout directives from the image's alt text.
//!
//! [`RenderPipeline`] runs both stages with one set of [`RenderOptions`].
//!
//! # Image directives
//!
//! ```text
//! ![Alt text|scale=50|align=left|caption=Caption text](/img/picture.png)
//! ```
//!
//! - `scale=N`: width in percent, clamped to 10..=100 (default 100)
//! - `align=left|right|center`: placement (default center)
//! - `caption=TEXT`: figure caption; `caption=-` means no caption
//!
//! # Example
//!
//! ```
//! use folio_renderer::{RenderOptions, RenderPipeline};
//!
//! let pipeline = RenderPipeline::new(RenderOptions::default());
//! let html = pipeline.render_html("![Map|scale=50|caption=Region](/img/map.png)");
//! assert!(html.contains("width:50%"));
//! assert!(html.contains(r#"alt="Map""#));
//! assert!(html.contains(">Region</figcaption>"));
//! ```

mod figure;
mod html;
mod pipeline;
mod renderer;
mod state;
mod util;

pub use figure::{
    Align, DEFAULT_CAPTION_STYLE, DEFAULT_FRAME_STYLE, DEFAULT_IMAGE_STYLE,
    DEFAULT_PLACEHOLDER_ALT, FULL_SOURCE_ATTR, FigureEnricher, FigureOptions, FigureStyle,
    ImageDirective, MAX_SCALE, MIN_SCALE, UnknownAlign,
};
pub use pipeline::{RenderOptions, RenderPipeline, RenderedPage};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{TocEntry, slugify};

/// Render markup to an HTML fragment using the extended profile.
///
/// Images are left as plain `<img>` elements with their alt text untouched.
#[must_use]
pub fn render(document: &str) -> String {
    MarkdownRenderer::new().render_markdown(document).html
}

/// Rewrite every `<img>` in `html` into a figure using default options.
#[must_use]
pub fn enrich(html: &str) -> String {
    FigureEnricher::default().enrich(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_directives_in_alt() {
        let html = render("![Dragon|caption=A wyrm](d.png)");
        assert!(html.contains(r#"alt="Dragon|caption=A wyrm""#));
    }

    #[test]
    fn test_render_then_enrich() {
        let html = enrich(&render("![Dragon|caption=A wyrm](d.png)"));
        assert!(html.contains(r#"alt="Dragon""#));
        assert!(html.contains(">A wyrm</figcaption>"));
    }

    #[test]
    fn test_free_functions_match_pipeline() {
        let doc = "Intro\n\n![Dragon|align=right|scale=40](d.png)";
        assert_eq!(
            enrich(&render(doc)),
            RenderPipeline::default().render_html(doc)
        );
    }
}
