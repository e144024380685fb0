//! CLI command implementations.

pub(crate) mod check_upload;
pub(crate) mod render;
pub(crate) mod slug;

pub(crate) use check_upload::CheckUploadArgs;
pub(crate) use render::RenderArgs;
pub(crate) use slug::SlugArgs;
