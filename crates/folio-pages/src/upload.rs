//! Image upload rules.
//!
//! Only the acceptance check lives here; storing the file is the caller's job.

use std::fmt;

/// Upload rejection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// No filename was sent.
    #[error("No file selected")]
    MissingFilename,
    /// Filename has no extension.
    #[error("File {0:?} has no extension")]
    NoExtension(String),
    /// Extension is not on the allow-list.
    #[error("File type .{extension} is not allowed (allowed: {allowed})")]
    ExtensionNotAllowed {
        /// Lowercased extension of the rejected file.
        extension: String,
        /// Comma-separated allow-list.
        allowed: String,
    },
    /// File exceeds the size limit.
    #[error("File is too large ({size} bytes, limit {max} bytes)")]
    TooLarge {
        /// Size of the rejected file in bytes.
        size: u64,
        /// Configured limit in bytes.
        max: u64,
    },
}

/// Image format recognised from a file extension.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
    Svg,
    /// Extension allowed by configuration but not known here.
    Other(String),
}

impl ImageKind {
    /// Classify a lowercase extension.
    #[must_use]
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            "webp" => Self::Webp,
            "svg" => Self::Svg,
            other => Self::Other(other.to_owned()),
        }
    }

    /// MIME type, when known.
    #[must_use]
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            Self::Png => Some("image/png"),
            Self::Jpeg => Some("image/jpeg"),
            Self::Gif => Some("image/gif"),
            Self::Webp => Some("image/webp"),
            Self::Svg => Some("image/svg+xml"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => f.write_str("PNG"),
            Self::Jpeg => f.write_str("JPEG"),
            Self::Gif => f.write_str("GIF"),
            Self::Webp => f.write_str("WebP"),
            Self::Svg => f.write_str("SVG"),
            Self::Other(ext) => write!(f, ".{ext}"),
        }
    }
}

/// Rules an uploaded image must satisfy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPolicy {
    allowed_extensions: Vec<String>,
    max_bytes: u64,
}

impl UploadPolicy {
    /// Create a policy. Extensions are matched case-insensitively.
    #[must_use]
    pub fn new<I, S>(allowed_extensions: I, max_bytes: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim().to_ascii_lowercase())
                .collect(),
            max_bytes,
        }
    }

    /// Largest accepted size in bytes.
    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Accepted extensions, lowercase.
    #[must_use]
    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Check an upload by filename and size.
    ///
    /// The extension is whatever follows the last `.` in the filename.
    ///
    /// # Errors
    ///
    /// Returns the first rule the upload breaks.
    pub fn check(&self, filename: &str, size: u64) -> Result<ImageKind, UploadError> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(UploadError::MissingFilename);
        }

        let extension = match filename.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext.to_ascii_lowercase(),
            _ => return Err(UploadError::NoExtension(filename.to_owned())),
        };

        if !self.allowed_extensions.contains(&extension) {
            return Err(UploadError::ExtensionNotAllowed {
                extension,
                allowed: self.allowed_extensions.join(", "),
            });
        }

        if size > self.max_bytes {
            return Err(UploadError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }

        Ok(ImageKind::from_extension(&extension))
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(["png", "jpg", "jpeg", "gif"], 10 * 1024 * 1024)
    }
}
