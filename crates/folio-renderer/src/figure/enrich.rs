//! Rewriting `<img>` elements into styled `<figure>` blocks.

use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};
use lol_html::errors::RewritingError;
use lol_html::html_content::{ContentType, Element};
use lol_html::{HtmlRewriter, Settings, element};

use super::FigureOptions;
use super::directive::ImageDirective;

/// Attribute holding the unscaled image URL for lightbox viewers.
pub const FULL_SOURCE_ATTR: &str = "data-fullsrc";

/// Errors from the underlying HTML rewriter.
///
/// Never returned from the public API: [`FigureEnricher::enrich`] logs them
/// and hands back the input unchanged.
#[derive(Debug, thiserror::Error)]
enum EnrichError {
    #[error("HTML rewrite error: {0}")]
    Rewrite(#[from] RewritingError),
    #[error("rewritten HTML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Image directive post-processor.
///
/// Scans an HTML fragment for `<img>` elements and replaces each one with a
/// `<figure>` whose layout comes from the directive in the image's alt text.
/// Everything else in the fragment passes through unchanged.
///
/// Not idempotent: the output already carries figures, and a second pass would
/// wrap every image again. Run it once per rendered document.
///
/// # Example
///
/// ```
/// use folio_renderer::{FigureEnricher, FigureOptions};
///
/// let enricher = FigureEnricher::new(FigureOptions::default());
/// let html = enricher.enrich(r#"<p><img src="d.png" alt="Dragon|caption=A wyrm"></p>"#);
/// assert!(html.contains(r#"alt="Dragon""#));
/// assert!(html.contains(">A wyrm</figcaption></figure>"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct FigureEnricher {
    options: FigureOptions,
}

impl FigureEnricher {
    /// Create an enricher with the given options.
    #[must_use]
    pub fn new(options: FigureOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    #[must_use]
    pub fn options(&self) -> &FigureOptions {
        &self.options
    }

    /// Rewrite every image in `html` into a figure.
    #[must_use]
    pub fn enrich(&self, html: &str) -> String {
        self.enrich_counted(html).0
    }

    /// Rewrite every image in `html` into a figure and report how many were built.
    #[must_use]
    pub fn enrich_counted(&self, html: &str) -> (String, usize) {
        if !contains_img_tag(html) {
            return (html.to_owned(), 0);
        }

        match self.rewrite(html) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "Figure rewrite failed, keeping images as-is");
                (html.to_owned(), 0)
            }
        }
    }

    fn rewrite(&self, html: &str) -> Result<(String, usize), EnrichError> {
        let mut output = Vec::with_capacity(html.len() + html.len() / 2);
        let mut figures = 0usize;

        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![element!("img", |el| {
                    self.rewrite_image(el)?;
                    figures += 1;
                    Ok(())
                })],
                ..Settings::default()
            },
            |c: &[u8]| output.extend_from_slice(c),
        );

        rewriter.write(html.as_bytes())?;
        rewriter.end()?;

        Ok((String::from_utf8(output)?, figures))
    }

    /// Rewrite one image and surround it with figure markup.
    fn rewrite_image(
        &self,
        el: &mut Element<'_, '_>,
    ) -> Result<(), lol_html::errors::AttributeNameError> {
        let alt = el.get_attribute("alt").unwrap_or_default();
        let directive = ImageDirective::parse(
            &decode_html_entities(&alt),
            &self.options.placeholder_alt,
        );

        el.set_attribute("alt", &encode_double_quoted_attribute(&directive.base_alt))?;
        let has_full_source = el
            .get_attribute(FULL_SOURCE_ATTR)
            .is_some_and(|value| !value.is_empty());
        if !has_full_source {
            let src = el.get_attribute("src").unwrap_or_default();
            el.set_attribute(FULL_SOURCE_ATTR, &src)?;
        }
        el.set_attribute(
            "style",
            &encode_double_quoted_attribute(&self.options.style.image),
        )?;

        el.before(&self.figure_open(&directive), ContentType::Html);
        el.after(&self.figure_close(&directive), ContentType::Html);
        Ok(())
    }

    fn figure_open(&self, directive: &ImageDirective) -> String {
        let style = self
            .options
            .style
            .figure_style(directive.align, directive.scale);
        format!(
            r#"<figure style="{}">"#,
            encode_double_quoted_attribute(&style)
        )
    }

    fn figure_close(&self, directive: &ImageDirective) -> String {
        match &directive.caption {
            Some(caption) => format!(
                r#"<figcaption style="{}">{}</figcaption></figure>"#,
                encode_double_quoted_attribute(&self.options.style.caption),
                encode_text(caption)
            ),
            None => "</figure>".to_owned(),
        }
    }
}

/// Whether `html` may hold an `<img>` start tag. Tag names are case-insensitive.
fn contains_img_tag(html: &str) -> bool {
    html.as_bytes()
        .windows(4)
        .any(|w| w.eq_ignore_ascii_case(b"<img"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::FigureStyle;
    use pretty_assertions::assert_eq;

    /// Enricher with empty frame styling so assertions stay short.
    fn enricher() -> FigureEnricher {
        FigureEnricher::new(FigureOptions {
            placeholder_alt: "Image".to_owned(),
            style: FigureStyle {
                frame: String::new(),
                image: "width:100%;".to_owned(),
                caption: "color:#555;".to_owned(),
            },
        })
    }

    #[test]
    fn test_plain_image_becomes_centered_figure() {
        let html = enricher().enrich(r#"<p><img src="d.png" alt="Dragon"></p>"#);
        assert_eq!(
            html,
            concat!(
                r#"<p><figure style="margin:0 auto; width:100%; display:block;">"#,
                r#"<img src="d.png" alt="Dragon" data-fullsrc="d.png" style="width:100%;">"#,
                "</figure></p>"
            )
        );
    }

    #[test]
    fn test_end_to_end_directive() {
        let html = enricher().enrich(
            r#"<img src="/img/map.png" alt="Map|scale=50|align=left|caption=Region overview">"#,
        );
        assert_eq!(
            html,
            concat!(
                r#"<figure style="float:left; margin:0 10px 10px 0; width:50%;">"#,
                r#"<img src="/img/map.png" alt="Map" data-fullsrc="/img/map.png" style="width:100%;">"#,
                r#"<figcaption style="color:#555;">Region overview</figcaption>"#,
                "</figure>"
            )
        );
    }

    #[test]
    fn test_caption_present_and_absent() {
        let with = enricher().enrich(r#"<img src="d.png" alt="Dragon|caption=A wyrm">"#);
        assert!(with.contains(r#"<figcaption style="color:#555;">A wyrm</figcaption>"#));

        let without = enricher().enrich(r#"<img src="d.png" alt="Dragon">"#);
        assert!(!without.contains("figcaption"));
    }

    #[test]
    fn test_caption_dash_sentinel_emits_nothing() {
        let html = enricher().enrich(r#"<img src="d.png" alt="Dragon|caption=-">"#);
        assert!(!html.contains("figcaption"));
    }

    #[test]
    fn test_empty_caption_emits_empty_figcaption() {
        let html = enricher().enrich(r#"<img src="d.png" alt="Dragon|caption=">"#);
        assert!(html.contains(r#"<figcaption style="color:#555;"></figcaption></figure>"#));
    }

    #[test]
    fn test_caption_is_escaped() {
        let html = enricher().enrich(r#"<img src="d.png" alt="x|caption=Fire &amp; <ice>">"#);
        assert!(html.contains(">Fire &amp; &lt;ice&gt;</figcaption>"));
    }

    #[test]
    fn test_align_left_default_width() {
        let html = enricher().enrich(r#"<img src="d.png" alt="Dragon|align=left">"#);
        assert!(html.contains(r#"<figure style="float:left; margin:0 10px 10px 0; width:100%;">"#));
    }

    #[test]
    fn test_align_right_scaled() {
        let html = enricher().enrich(r#"<img src="d.png" alt="Dragon|align=right|scale=40">"#);
        assert!(html.contains(r#"<figure style="float:right; margin:0 0 10px 10px; width:40%;">"#));
    }

    #[test]
    fn test_scale_clamping_reaches_style() {
        let small = enricher().enrich(r#"<img src="d.png" alt="x|scale=5">"#);
        assert!(small.contains("width:10%;"));
        let large = enricher().enrich(r#"<img src="d.png" alt="x|scale=500">"#);
        assert!(large.contains("width:100%; display:block;"));
        let junk = enricher().enrich(r#"<img src="d.png" alt="x|scale=abc">"#);
        assert!(junk.contains("margin:0 auto; width:100%;"));
    }

    #[test]
    fn test_no_directive_leaks_into_alt() {
        let html = enricher().enrich(concat!(
            r#"<img src="a.png" alt="A|scale=20|caption=c|align=right">"#,
            r#"<img src="b.png" alt="|caption=only">"#,
        ));
        assert!(!html.contains("alt=\"A|"));
        for key in ["scale=", "caption=", "align="] {
            assert!(
                !html.split("alt=\"").skip(1).any(|rest| {
                    rest.split('"').next().unwrap_or_default().contains(key)
                }),
                "{key} leaked into alt: {html}"
            );
        }
        assert!(html.contains(r#"alt="Image""#));
    }

    #[test]
    fn test_missing_alt_uses_placeholder() {
        let html = enricher().enrich(r#"<img src="d.png">"#);
        assert!(html.contains(r#"alt="Image""#));
    }

    #[test]
    fn test_existing_full_source_kept() {
        let html = enricher().enrich(r#"<img src="thumb.png" data-fullsrc="full.png" alt="x">"#);
        assert!(html.contains(r#"data-fullsrc="full.png""#));
        assert!(!html.contains(r#"data-fullsrc="thumb.png""#));
    }

    #[test]
    fn test_empty_full_source_replaced() {
        let html = enricher().enrich(r#"<img src="thumb.png" data-fullsrc="" alt="x">"#);
        assert!(html.contains(r#"data-fullsrc="thumb.png""#));
    }

    #[test]
    fn test_existing_style_replaced() {
        let html = enricher().enrich(r#"<img src="d.png" style="width:20px" alt="x">"#);
        assert!(html.contains(r#"style="width:100%;""#));
        assert!(!html.contains("width:20px"));
    }

    #[test]
    fn test_unrelated_markup_untouched() {
        let input = r#"<h2 id="a">Title</h2><p>Text &amp; <em>more</em></p><!-- note --><table><tr><td>1</td></tr></table>"#;
        assert_eq!(enricher().enrich(input), input);
    }

    #[test]
    fn test_every_image_rewritten() {
        let (html, count) = enricher().enrich_counted(
            r#"<p><img src="a.png" alt="a"> and <img src="b.png" alt="b|align=right"></p>"#,
        );
        assert_eq!(count, 2);
        assert_eq!(html.matches("<figure ").count(), 2);
        assert_eq!(html.matches("</figure>").count(), 2);
    }

    #[test]
    fn test_mixed_case_tag_rewritten() {
        let (html, count) =
            enricher().enrich_counted(r#"<p><Img src="m.png" alt="Mixed|align=left"></p>"#);
        assert_eq!(count, 1);
        assert!(html.contains("<figure"));
        assert!(html.contains("float:left"));
        assert!(html.contains(r#"alt="Mixed""#));
        assert!(!html.contains("|align="));
    }

    #[test]
    fn test_img_tag_detection() {
        assert!(contains_img_tag("<IMG src=a>"));
        assert!(contains_img_tag("x<iMg src=a>"));
        assert!(!contains_img_tag("<p>image</p>"));
        assert!(!contains_img_tag("<im"));
    }

    #[test]
    fn test_no_images_counts_zero() {
        let (html, count) = enricher().enrich_counted("<p>No pictures</p>");
        assert_eq!(html, "<p>No pictures</p>");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_unbalanced_html_recovers() {
        let html = enricher().enrich(r#"<div><p><img src="d.png" alt="x|align=left"><span>open"#);
        assert!(html.contains(r#"<figure style="float:left;"#));
        assert!(html.ends_with("<span>open"));
    }

    #[test]
    fn test_second_pass_wraps_again() {
        let once = enricher().enrich(r#"<img src="d.png" alt="Dragon|caption=A wyrm">"#);
        let twice = enricher().enrich(&once);
        assert_ne!(once, twice);
        assert_eq!(twice.matches("<figure ").count(), 2);
    }

    #[test]
    fn test_default_style_applied() {
        let html = FigureEnricher::default().enrich(r#"<img src="d.png" alt="x">"#);
        assert!(html.contains("background:#f1f1f1;"));
        assert!(html.contains(r#"style="width:100%; display:block; height:auto;""#));
    }
}
