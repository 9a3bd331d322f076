//! Configuration for the m2h markdown converter.
//!
//! A [`Config`] maps the seven symbolic options of the converter to tag tokens
//! and attribute maps. Every option has a default, so an empty `m2h.toml` (or no
//! file at all) yields the stock output:
//!
//! ```toml
//! container_tag = "div"
//! container_attr = { class = "markdown-body" }
//! code_tag = "pre"
//! code_attr = { class = "codehilite" }
//! formula_tag = "script"
//! formula_attr = { type = "math/tex" }
//! comment_tag = "blockquote"
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "m2h.toml";

/// Attribute map attached to configured elements.
pub type AttrMap = BTreeMap<String, String>;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the document container tag.
    pub container_tag: Option<String>,
    /// Override the code block tag.
    pub code_tag: Option<String>,
    /// Override the formula tag.
    pub formula_tag: Option<String>,
    /// Override the blockquote tag.
    pub comment_tag: Option<String>,
}

/// Converter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tag wrapping the whole document.
    #[serde(alias = "markdown_tag")]
    pub container_tag: String,
    /// Attributes of the document container.
    #[serde(alias = "markdown_attr")]
    pub container_attr: AttrMap,
    /// Tag of fenced code blocks.
    pub code_tag: String,
    /// Attributes of fenced code blocks and inline code.
    pub code_attr: AttrMap,
    /// Tag of formula blocks and inline formulas.
    pub formula_tag: String,
    /// Attributes of formula blocks and inline formulas.
    pub formula_attr: AttrMap,
    /// Tag of blockquotes.
    pub comment_tag: String,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            container_tag: "div".to_owned(),
            container_attr: attrs([("class", "markdown-body")]),
            code_tag: "pre".to_owned(),
            code_attr: attrs([("class", "codehilite")]),
            formula_tag: "script".to_owned(),
            formula_attr: attrs([("type", "math/tex")]),
            comment_tag: "blockquote".to_owned(),
            config_path: None,
        }
    }
}

fn attrs<const N: usize>(pairs: [(&str, &str); N]) -> AttrMap {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
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
}

/// Require a tag token to be non-empty and made of tag-name characters.
fn require_tag(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':')
    {
        return Err(ConfigError::Validation(format!(
            "{field} must be a tag name, got {value:?}"
        )));
    }
    Ok(())
}

/// Require attribute names to be non-empty and free of whitespace and quotes.
fn require_attr_names(attrs: &AttrMap, field: &str) -> Result<(), ConfigError> {
    for name in attrs.keys() {
        if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c == '"' || c == '=') {
            return Err(ConfigError::Validation(format!(
                "{field} has invalid attribute name {name:?}"
            )));
        }
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `m2h.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the loaded values are invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is malformed or contains unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Class attribute of code elements, if configured.
    ///
    /// Text appended to a node carrying this class is wrapped as inline code.
    #[must_use]
    pub fn code_class(&self) -> Option<&str> {
        self.code_attr.get("class").map(String::as_str)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(tag) = &settings.container_tag {
            self.container_tag.clone_from(tag);
        }
        if let Some(tag) = &settings.code_tag {
            self.code_tag.clone_from(tag);
        }
        if let Some(tag) = &settings.formula_tag {
            self.formula_tag.clone_from(tag);
        }
        if let Some(tag) = &settings.comment_tag {
            self.comment_tag.clone_from(tag);
        }
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file. The converter itself
    /// renders whatever is stored, so configs built in code are only checked
    /// when callers ask for it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_tag(&self.container_tag, "container_tag")?;
        require_tag(&self.code_tag, "code_tag")?;
        require_tag(&self.formula_tag, "formula_tag")?;
        require_tag(&self.comment_tag, "comment_tag")?;
        require_attr_names(&self.container_attr, "container_attr")?;
        require_attr_names(&self.code_attr, "code_attr")?;
        require_attr_names(&self.formula_attr, "formula_attr")?;
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
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
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }
}
