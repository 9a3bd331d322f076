//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod tree;

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use m2h_config::{CliSettings, Config};

use crate::error::CliError;

pub(crate) use convert::ConvertArgs;
pub(crate) use tree::TreeArgs;

/// Input and configuration arguments shared by every command.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Markdown file to read (default: stdin, also when `-`).
    input: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover m2h.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document container tag (overrides config).
    #[arg(long)]
    container_tag: Option<String>,

    /// Code block tag (overrides config).
    #[arg(long)]
    code_tag: Option<String>,

    /// Formula tag (overrides config).
    #[arg(long)]
    formula_tag: Option<String>,

    /// Blockquote tag (overrides config).
    #[arg(long)]
    comment_tag: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SourceArgs {
    /// Load configuration with command-line overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the result is invalid.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            container_tag: self.container_tag.clone(),
            code_tag: self.code_tag.clone(),
            formula_tag: self.formula_tag.clone(),
            comment_tag: self.comment_tag.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Read the markdown source from the input file or stdin.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    pub(crate) fn read_input(&self) -> Result<String, CliError> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                tracing::info!(path = %path.display(), "Reading markdown");
                Ok(std::fs::read_to_string(path)?)
            }
            _ => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                Ok(buf)
            }
        }
    }
}
