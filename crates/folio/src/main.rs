//! Folio CLI - page rendering.
//!
//! Provides commands for:
//! - `render`: Render a markdown page to HTML with image figures
//! - `slug`: Show the URL slug for a page title
//! - `check-upload`: Check an image against the upload rules

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckUploadArgs, RenderArgs, SlugArgs};
use output::Output;

/// Folio - markdown pages with image figures.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown page to HTML.
    Render(RenderArgs),
    /// Print the URL slug for a page title.
    Slug(SlugArgs),
    /// Check whether an image upload would be accepted.
    CheckUpload(CheckUploadArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Slug(args) => args.execute(),
        Commands::CheckUpload(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_flags() {
        let cli = Cli::try_parse_from([
            "folio", "render", "page.md", "-o", "out.html", "--json", "--title", "--no-extended",
            "-v",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Render(args) if args.verbose));
    }

    #[test]
    fn test_parse_slug_requires_title() {
        assert!(Cli::try_parse_from(["folio", "slug"]).is_err());
        assert!(
            Cli::try_parse_from(["folio", "slug", "My", "Page", "--taken", "my+page"]).is_ok()
        );
    }

    #[test]
    fn test_parse_check_upload() {
        assert!(Cli::try_parse_from(["folio", "check-upload", "map.png", "--size", "1024"]).is_ok());
        assert!(Cli::try_parse_from(["folio", "check-upload", "map.png", "--size", "-1"]).is_err());
    }
}
