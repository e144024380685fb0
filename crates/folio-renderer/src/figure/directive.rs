//! Image directive parsing.
//!
//! Parses the pipe-delimited `alt|key=value|...` syntax carried in image
//! alt text. Parsing is a fold over the segments onto an accumulator that
//! starts at the defaults; a segment that cannot be understood leaves the
//! accumulator untouched.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

/// Smallest display scale, in percent.
pub const MIN_SCALE: u8 = 10;
/// Largest display scale, in percent.
pub const MAX_SCALE: u8 = 100;

/// Caption value that means "no caption".
const NO_CAPTION: &str = "-";

/// Horizontal placement of a figure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Align {
    /// Floated left, text wraps on the right.
    Left,
    /// Floated right, text wraps on the left.
    Right,
    /// Centered block.
    #[default]
    Center,
}

impl Align {
    /// Lowercase name as used in directives.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an alignment name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown alignment: {0}")]
pub struct UnknownAlign(pub String);

impl FromStr for Align {
    type Err = UnknownAlign;

    /// Parse a trimmed, case-insensitive alignment name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "center" => Ok(Self::Center),
            _ => Err(UnknownAlign(s.to_owned())),
        }
    }
}

/// Rendering directive parsed from one image's alt text.
///
/// # Example
///
/// ```
/// use folio_renderer::{Align, ImageDirective};
///
/// let directive = ImageDirective::parse("Map|scale=50|align=left|caption=Region", "Image");
/// assert_eq!(directive.base_alt, "Map");
/// assert_eq!(directive.scale, 50);
/// assert_eq!(directive.align, Align::Left);
/// assert_eq!(directive.caption.as_deref(), Some("Region"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImageDirective {
    /// Display alt text (everything before the first `|`).
    pub base_alt: String,
    /// Display width in percent of the content column, within `MIN_SCALE..=MAX_SCALE`.
    pub scale: u8,
    /// Caption text. `None` means no `<figcaption>` at all; `Some("")` is an empty caption.
    pub caption: Option<String>,
    /// Horizontal placement.
    pub align: Align,
}

impl ImageDirective {
    /// Directive with default values and the given alt text.
    #[must_use]
    pub fn new(base_alt: impl Into<String>) -> Self {
        Self {
            base_alt: base_alt.into(),
            scale: MAX_SCALE,
            caption: None,
            align: Align::Center,
        }
    }

    /// Parse alt text into a directive.
    ///
    /// The first `|`-separated segment (trimmed) is the display alt text;
    /// `placeholder` is used when it is empty. Every later segment is trimmed
    /// and matched case-sensitively against `scale=`, `caption=` and `align=`;
    /// anything else is skipped.
    #[must_use]
    pub fn parse(alt: &str, placeholder: &str) -> Self {
        let mut segments = alt.split('|');
        let base_alt = segments.next().map(str::trim).unwrap_or_default();
        let base_alt = if base_alt.is_empty() {
            placeholder
        } else {
            base_alt
        };

        segments
            .map(str::trim)
            .fold(Self::new(base_alt), Self::apply_segment)
    }

    /// Apply one `key=value` segment.
    fn apply_segment(mut self, segment: &str) -> Self {
        if let Some(value) = segment.strip_prefix("scale=") {
            if let Some(scale) = parse_scale(value) {
                self.scale = scale;
            }
        } else if let Some(value) = segment.strip_prefix("caption=") {
            let value = value.trim();
            self.caption = (value != NO_CAPTION).then(|| value.to_owned());
        } else if let Some(value) = segment.strip_prefix("align=") {
            self.align = value.parse().unwrap_or_default();
        }
        self
    }
}

/// Parse a scale value and clamp it to `MIN_SCALE..=MAX_SCALE`.
///
/// Returns `None` for values that are not integers. Integers too large to
/// represent still clamp by sign.
fn parse_scale(value: &str) -> Option<u8> {
    let clamp = |n: i64| {
        let clamped = n.clamp(i64::from(MIN_SCALE), i64::from(MAX_SCALE));
        u8::try_from(clamped).unwrap_or(MAX_SCALE)
    };

    match value.trim().parse::<i64>() {
        Ok(n) => Some(clamp(n)),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(MAX_SCALE),
            IntErrorKind::NegOverflow => Some(MIN_SCALE),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(alt: &str) -> ImageDirective {
        ImageDirective::parse(alt, "Image")
    }

    #[test]
    fn test_plain_alt_uses_defaults() {
        assert_eq!(parse("Dragon"), ImageDirective::new("Dragon"));
        let directive = parse("Dragon");
        assert_eq!(directive.scale, 100);
        assert_eq!(directive.caption, None);
        assert_eq!(directive.align, Align::Center);
    }

    #[test]
    fn test_empty_alt_uses_placeholder() {
        assert_eq!(parse("").base_alt, "Image");
        assert_eq!(parse("   ").base_alt, "Image");
        assert_eq!(parse("|scale=50").base_alt, "Image");
        assert_eq!(ImageDirective::parse("", "Obrázok").base_alt, "Obrázok");
    }

    #[test]
    fn test_base_alt_trimmed() {
        assert_eq!(parse("  Dragon  | scale=20 ").base_alt, "Dragon");
        assert_eq!(parse("  Dragon  | scale=20 ").scale, 20);
    }

    #[test]
    fn test_scale_clamped() {
        assert_eq!(parse("x|scale=5").scale, 10);
        assert_eq!(parse("x|scale=500").scale, 100);
        assert_eq!(parse("x|scale=-20").scale, 10);
        assert_eq!(parse("x|scale=10").scale, 10);
        assert_eq!(parse("x|scale=100").scale, 100);
        assert_eq!(parse("x|scale=+45").scale, 45);
    }

    #[test]
    fn test_scale_overflow_clamps_by_sign() {
        assert_eq!(parse("x|scale=99999999999999999999999").scale, 100);
        assert_eq!(parse("x|scale=-99999999999999999999999").scale, 10);
    }

    #[test]
    fn test_scale_invalid_ignored() {
        assert_eq!(parse("x|scale=abc").scale, 100);
        assert_eq!(parse("x|scale=").scale, 100);
        assert_eq!(parse("x|scale=12.5").scale, 100);
    }

    #[test]
    fn test_scale_invalid_keeps_previous_value() {
        assert_eq!(parse("x|scale=40|scale=abc").scale, 40);
    }

    #[test]
    fn test_scale_later_value_wins() {
        assert_eq!(parse("x|scale=40|scale=60").scale, 60);
    }

    #[test]
    fn test_caption() {
        assert_eq!(
            parse("Dragon|caption=A wyrm").caption.as_deref(),
            Some("A wyrm")
        );
        assert_eq!(
            parse("Dragon|caption=  spaced out  ").caption.as_deref(),
            Some("spaced out")
        );
    }

    #[test]
    fn test_caption_empty_is_present() {
        assert_eq!(parse("Dragon|caption=").caption.as_deref(), Some(""));
    }

    #[test]
    fn test_caption_dash_means_absent() {
        assert_eq!(parse("Dragon|caption=-").caption, None);
        assert_eq!(parse("Dragon|caption=A wyrm|caption=-").caption, None);
    }

    #[test]
    fn test_caption_keeps_equals_signs() {
        assert_eq!(
            parse("Eq|caption=a=b").caption.as_deref(),
            Some("a=b")
        );
    }

    #[test]
    fn test_align_values() {
        assert_eq!(parse("x|align=left").align, Align::Left);
        assert_eq!(parse("x|align=right").align, Align::Right);
        assert_eq!(parse("x|align=center").align, Align::Center);
        assert_eq!(parse("x|align= RIGHT ").align, Align::Right);
    }

    #[test]
    fn test_align_unknown_falls_back_to_center() {
        assert_eq!(parse("x|align=middle").align, Align::Center);
        assert_eq!(parse("x|align=left|align=sideways").align, Align::Center);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let directive = parse("x|Scale=20|CAPTION=Hi|Align=left");
        assert_eq!(directive, ImageDirective::new("x"));
    }

    #[test]
    fn test_unknown_segments_ignored() {
        let directive = parse("x|border=2|lightbox|scale=30");
        assert_eq!(directive.scale, 30);
        assert_eq!(directive.caption, None);
    }

    #[test]
    fn test_all_directives() {
        let directive = parse("Map|scale=50|align=left|caption=Region overview");
        assert_eq!(
            directive,
            ImageDirective {
                base_alt: "Map".to_owned(),
                scale: 50,
                caption: Some("Region overview".to_owned()),
                align: Align::Left,
            }
        );
    }

    #[test]
    fn test_align_from_str() {
        assert_eq!("Left".parse::<Align>(), Ok(Align::Left));
        assert!("up".parse::<Align>().is_err());
        assert_eq!(Align::Right.to_string(), "right");
    }
}
