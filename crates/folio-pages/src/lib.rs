//! Page-level helpers for Folio.
//!
//! - [`slug`]: URL slugs derived from page titles, with collision suffixes
//! - [`upload`]: acceptance rules for uploaded images

pub mod slug;
pub mod upload;

pub use slug::{SlugGenerator, slugify_title, unique_slug};
pub use upload::{ImageKind, UploadError, UploadPolicy};
