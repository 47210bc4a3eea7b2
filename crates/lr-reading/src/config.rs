//! Reader configuration, optionally loaded from a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::prompt::TemplateStyle;

/// Configuration for a reading service.
///
/// ```toml
/// data_dir = "data"
/// model = "gpt-4o-mini"
/// template = "structured"
/// seed = 7
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    /// Directory holding `cards.json`, `spreads.json` and `lenormand_notes.txt`.
    pub data_dir: PathBuf,
    /// Model name written into prompts.
    pub model: String,
    /// Prompt template style.
    pub template: TemplateStyle,
    /// Seed for reproducible draws. Draws use a fresh thread-local RNG when unset.
    pub seed: Option<u64>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            model: "gpt-4o-mini".to_string(),
            template: TemplateStyle::default(),
            seed: None,
        }
    }
}

impl ReaderConfig {
    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the template style.
    pub fn with_template(mut self, template: TemplateStyle) -> Self {
        self.template = template;
        self
    }

    /// Set the draw seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Path of the card table.
    pub fn cards_path(&self) -> PathBuf {
        self.data_dir.join("cards.json")
    }

    /// Path of the spread table.
    pub fn spreads_path(&self) -> PathBuf {
        self.data_dir.join("spreads.json")
    }

    /// Path of the note corpus.
    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join("lenormand_notes.txt")
    }
}
