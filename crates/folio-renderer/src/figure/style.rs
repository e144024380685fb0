//! Inline presentation rules for figures.

use super::directive::Align;

/// Default frame rules shared by every figure.
pub const DEFAULT_FRAME_STYLE: &str =
    "background:#f1f1f1; padding:5px; border:1px solid #ccc; clear:both;";
/// Default rules for the image inside a figure.
pub const DEFAULT_IMAGE_STYLE: &str = "width:100%; display:block; height:auto;";
/// Default rules for the caption.
pub const DEFAULT_CAPTION_STYLE: &str = "text-align:center; color:#555; font-size:smaller;";

/// Inline styles applied to generated figures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FigureStyle {
    /// Rules every figure starts with (background, border, padding).
    pub frame: String,
    /// Rules for the `<img>`. Should keep the aspect ratio and fill the figure.
    pub image: String,
    /// Rules for the `<figcaption>`.
    pub caption: String,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            frame: DEFAULT_FRAME_STYLE.to_owned(),
            image: DEFAULT_IMAGE_STYLE.to_owned(),
            caption: DEFAULT_CAPTION_STYLE.to_owned(),
        }
    }
}

impl FigureStyle {
    /// Build the `style` attribute for a figure.
    ///
    /// The frame rules come first, followed by placement rules for `align`
    /// and a width of `scale` percent.
    #[must_use]
    pub fn figure_style(&self, align: Align, scale: u8) -> String {
        let placement = match align {
            Align::Left => format!("float:left; margin:0 10px 10px 0; width:{scale}%;"),
            Align::Right => format!("float:right; margin:0 0 10px 10px; width:{scale}%;"),
            Align::Center => format!("margin:0 auto; width:{scale}%; display:block;"),
        };
        let frame = self.frame.trim();
        if frame.is_empty() {
            placement
        } else if frame.ends_with(';') {
            format!("{frame} {placement}")
        } else {
            format!("{frame}; {placement}")
        }
    }
}
