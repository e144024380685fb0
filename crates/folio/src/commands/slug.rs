//! `folio slug` command implementation.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use folio_config::Config;
use folio_pages::SlugGenerator;

use crate::error::CliError;

/// Arguments for the slug command.
#[derive(Args)]
pub(crate) struct SlugArgs {
    /// Page title (multiple words are joined with spaces).
    #[arg(required = true, num_args = 1..)]
    title: Vec<String>,

    /// Slug already used by another page (repeatable).
    #[arg(long = "taken", value_name = "SLUG")]
    taken: Vec<String>,

    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SlugArgs {
    /// Execute the slug command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or stdout is closed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let generator = SlugGenerator::new(config.pages.fallback_slug);
        let slug = resolve_slug(&generator, &self.title.join(" "), &self.taken);

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{slug}")?;
        Ok(())
    }
}

/// Pick a slug for `title` that is not in `taken`.
fn resolve_slug(generator: &SlugGenerator, title: &str, taken: &[String]) -> String {
    let taken: HashSet<&str> = taken.iter().map(String::as_str).collect();
    generator.unique(title, |candidate| taken.contains(candidate))
}
