//! Image figures.
//!
//! Post-processing stage that turns every `<img>` in rendered HTML into a
//! styled `<figure>`. Layout is controlled by a directive written into the
//! image's alt text:
//!
//! ```text
//! ![Map|scale=50|align=left|caption=Region overview](/img/map.png)
//! ```
//!
//! - [`directive`]: parsing of the `alt|key=value` syntax
//! - [`style`]: inline CSS for frames, images and captions
//! - [`enrich`]: the HTML rewriter

mod directive;
mod enrich;
mod style;

pub use directive::{Align, ImageDirective, MAX_SCALE, MIN_SCALE, UnknownAlign};
pub use enrich::{FULL_SOURCE_ATTR, FigureEnricher};
pub use style::{DEFAULT_CAPTION_STYLE, DEFAULT_FRAME_STYLE, DEFAULT_IMAGE_STYLE, FigureStyle};

/// Alt text used when an image has none.
pub const DEFAULT_PLACEHOLDER_ALT: &str = "Image";

/// Settings for figure generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FigureOptions {
    /// Alt text substituted when the directive's alt part is empty.
    pub placeholder_alt: String,
    /// Inline styles for generated markup.
    pub style: FigureStyle,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            placeholder_alt: DEFAULT_PLACEHOLDER_ALT.to_owned(),
            style: FigureStyle::default(),
        }
    }
}
