//! `m2h tree` command implementation.

use clap::Args;
use m2h_renderer::Markdown;

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print JSON on a single line.
    #[arg(long)]
    compact: bool,
}

impl TreeArgs {
    /// Execute the tree command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, input cannot be read or
    /// serialization fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.source.load_config()?;
        let markdown = self.source.read_input()?;

        let mut converter = Markdown::new(config);
        converter.convert(&markdown);
        let Some(dom) = converter.dom_tree() else {
            return Ok(());
        };

        let json = if self.compact {
            serde_json::to_string(dom)?
        } else {
            serde_json::to_string_pretty(dom)?
        };
        output.document(&json)?;
        Ok(())
    }
}
