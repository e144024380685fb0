//! `folio check-upload` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use folio_config::Config;
use folio_pages::{ImageKind, UploadPolicy};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check-upload command.
#[derive(Args)]
pub(crate) struct CheckUploadArgs {
    /// Name of the file to upload.
    filename: String,

    /// File size in bytes (default: size of the file on disk, if it exists).
    #[arg(long)]
    size: Option<u64>,

    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CheckUploadArgs {
    /// Execute the check-upload command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Upload` when the file would be rejected.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let policy = UploadPolicy::new(
            &config.uploads.allowed_extensions,
            config.uploads.max_bytes(),
        );

        let size = self.size.unwrap_or_else(|| size_on_disk(Path::new(&self.filename)));
        let kind = policy.check(&self.filename, size)?;

        output.success(&format!("{}: accepted", self.filename));
        output.detail(&describe(&kind, size));
        Ok(())
    }
}

/// Size of an existing file, or 0 when it cannot be read.
fn size_on_disk(path: &Path) -> u64 {
    std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0)
}

fn describe(kind: &ImageKind, size: u64) -> String {
    match kind.mime_type() {
        Some(mime) => format!("{kind} image ({mime}), {size} bytes"),
        None => format!("{kind} file, {size} bytes"),
    }
}
