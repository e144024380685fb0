//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `figures.frame_style`
//! - `figures.image_style`
//! - `figures.caption_style`
//! - `pages.fallback_slug`

mod expand;

use std::path::{Path, PathBuf};

use folio_renderer::{
    DEFAULT_CAPTION_STYLE, DEFAULT_FRAME_STYLE, DEFAULT_IMAGE_STYLE, DEFAULT_PLACEHOLDER_ALT,
    FigureOptions, FigureStyle, RenderOptions,
};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override extended markup profile flag.
    pub extended: Option<bool>,
    /// Override title extraction flag.
    pub extract_title: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// Upper bound for `uploads.max_size_mb`.
const MAX_UPLOAD_MB: u64 = 100;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markup rendering configuration.
    pub render: RenderConfig,
    /// Figure styling configuration.
    pub figures: FiguresConfig,
    /// Page configuration.
    pub pages: PagesConfig,
    /// Image upload configuration.
    pub uploads: UploadsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markup rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Enable tables, footnotes, definition lists and the rest of the extended profile.
    pub extended: bool,
    /// Pull the first H1 out as the page title.
    pub extract_title: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            extended: true,
            extract_title: false,
        }
    }
}

/// Figure styling configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FiguresConfig {
    /// Alt text used when an image has none.
    pub placeholder_alt: String,
    /// Inline CSS shared by every figure frame.
    pub frame_style: String,
    /// Inline CSS for images inside figures.
    pub image_style: String,
    /// Inline CSS for captions.
    pub caption_style: String,
}

impl Default for FiguresConfig {
    fn default() -> Self {
        Self {
            placeholder_alt: DEFAULT_PLACEHOLDER_ALT.to_owned(),
            frame_style: DEFAULT_FRAME_STYLE.to_owned(),
            image_style: DEFAULT_IMAGE_STYLE.to_owned(),
            caption_style: DEFAULT_CAPTION_STYLE.to_owned(),
        }
    }
}

/// Page configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Slug used when a title has no usable characters.
    pub fallback_slug: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            fallback_slug: "page".to_owned(),
        }
    }
}

/// Image upload configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    /// Accepted file extensions, lowercase and without the dot.
    pub allowed_extensions: Vec<String>,
    /// Largest accepted upload in megabytes.
    pub max_size_mb: u64,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: ["png", "jpg", "jpeg", "gif"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            max_size_mb: 10,
        }
    }
}

impl UploadsConfig {
    /// Upload size limit in bytes.
    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`figures.frame_style`").
        field: String,
        /// Error message (e.g., "${`FOLIO_FRAME`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_config(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(extended) = settings.extended {
            self.render.extended = extended;
        }
        if let Some(extract_title) = settings.extract_title {
            self.render.extract_title = extract_title;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.figures.placeholder_alt, "figures.placeholder_alt")?;
        self.validate_pages()?;
        self.validate_uploads()?;
        Ok(())
    }

    /// Validate page configuration.
    fn validate_pages(&self) -> Result<(), ConfigError> {
        let slug = &self.pages.fallback_slug;
        require_non_empty(slug, "pages.fallback_slug")?;

        if let Some(c) = slug
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '+' | '-')))
        {
            return Err(ConfigError::Validation(format!(
                "pages.fallback_slug contains invalid character {c:?} (allowed: ASCII letters, digits, '+', '-')"
            )));
        }

        Ok(())
    }

    /// Validate upload configuration.
    fn validate_uploads(&self) -> Result<(), ConfigError> {
        let uploads = &self.uploads;
        if uploads.allowed_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "uploads.allowed_extensions cannot be empty".to_owned(),
            ));
        }
        for ext in &uploads.allowed_extensions {
            require_non_empty(ext, "uploads.allowed_extensions entry")?;
            if ext.contains('.') {
                return Err(ConfigError::Validation(format!(
                    "uploads.allowed_extensions entry {ext:?} must not contain a dot"
                )));
            }
        }

        if uploads.max_size_mb == 0 {
            return Err(ConfigError::Validation(
                "uploads.max_size_mb must be greater than 0".to_owned(),
            ));
        }
        if uploads.max_size_mb > MAX_UPLOAD_MB {
            return Err(ConfigError::Validation(format!(
                "uploads.max_size_mb cannot exceed {MAX_UPLOAD_MB}"
            )));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let figures = &mut self.figures;
        figures.frame_style = expand::expand_env(&figures.frame_style, "figures.frame_style")?;
        figures.image_style = expand::expand_env(&figures.image_style, "figures.image_style")?;
        figures.caption_style =
            expand::expand_env(&figures.caption_style, "figures.caption_style")?;

        self.pages.fallback_slug =
            expand::expand_env(&self.pages.fallback_slug, "pages.fallback_slug")?;

        Ok(())
    }

    /// Build renderer options from this configuration.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            extended: self.render.extended,
            extract_title: self.render.extract_title,
            figures: FigureOptions {
                placeholder_alt: self.figures.placeholder_alt.clone(),
                style: FigureStyle {
                    frame: self.figures.frame_style.clone(),
                    image: self.figures.image_style.clone(),
                    caption: self.figures.caption_style.clone(),
                },
            },
        }
    }
}
