//! `folio render` command implementation.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_renderer::{RenderPipeline, RenderedPage};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: read stdin).
    file: Option<PathBuf>,

    /// Write the result to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit JSON with html, title, toc and figure count.
    #[arg(long)]
    json: bool,

    /// Extract the first H1 heading as the page title.
    #[arg(long)]
    title: bool,

    /// Disable tables, footnotes and the rest of the extended profile.
    #[arg(long)]
    no_extended: bool,

    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (render timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input or output fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            extended: self.no_extended.then_some(false),
            extract_title: self.title.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let source = self.read_source()?;
        let pipeline = RenderPipeline::new(config.render_options());
        let page = pipeline.render_page(Some(&source));
        let rendered = format_page(&page, self.json)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &rendered)?;
                output.success(&format!("Wrote {}", path.display()));
                if page.figures > 0 {
                    output.detail(&format!("{} figure(s)", page.figures));
                }
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(rendered.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }

    /// Read markup from the input file or stdin.
    fn read_source(&self) -> Result<String, CliError> {
        match &self.file {
            Some(path) => Ok(std::fs::read_to_string(path)?),
            None => {
                let mut source = String::new();
                io::stdin().lock().read_to_string(&mut source)?;
                Ok(source)
            }
        }
    }
}

/// Format a rendered page as HTML or pretty JSON, newline-terminated.
fn format_page(page: &RenderedPage, json: bool) -> Result<String, CliError> {
    let mut out = if json {
        serde_json::to_string_pretty(page)?
    } else {
        page.html.clone()
    };
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}
