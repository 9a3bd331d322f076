//! `m2h convert` command implementation.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use m2h_renderer::Markdown;

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or input/output fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.source.load_config()?;
        let markdown = self.source.read_input()?;

        let start = Instant::now();
        let mut converter = Markdown::new(config);
        let html = converter.convert(&markdown);
        tracing::info!(
            bytes = html.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Converted markdown"
        );

        match self.output {
            Some(path) => {
                std::fs::write(&path, html)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => output.document(html)?,
        }
        Ok(())
    }
}
