//! Session configuration for the interactive front end.
//!
//! Defines the YAML-serializable configuration naming the catalogs to load,
//! the REPL prompt, and aspect names known in addition to those the catalogs
//! declare.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! catalogs:
//!   - catalogs/base.yaml
//!   - catalogs/expansion.json
//! prompt: "field> "
//! aspects:
//!   - winter
//!   - lore.winter
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::loader::CatalogBuilder;

/// Top-level session configuration.
///
/// Every key is optional; missing keys take their [`Default`] values.
///
/// # Examples
///
/// ```
/// use field_prompt_catalog::SessionConfig;
///
/// let config: SessionConfig = serde_yaml::from_str("prompt: \"field> \"").unwrap();
/// assert_eq!(config.prompt, "field> ");
/// assert!(config.catalogs.is_empty());
/// assert_eq!(config.version, "1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Catalog files loaded at startup, in order.
    pub catalogs: Vec<PathBuf>,
    /// Prompt shown by the REPL.
    pub prompt: String,
    /// Extra aspect names.
    pub aspects: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            catalogs: Vec::new(),
            prompt: "> ".to_string(),
            aspects: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::CatalogError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::CatalogError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Loads configuration from `path` when it exists, falling back to the
    /// defaults otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load) for a file that exists.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No session config, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Returns a [`CatalogBuilder`] seeded with this configuration's
    /// catalogs and extra aspects.
    ///
    /// Relative catalog paths are taken relative to `base`, normally the
    /// directory holding the configuration file.
    pub fn catalog_builder(&self, base: impl AsRef<Path>) -> CatalogBuilder {
        let base = base.as_ref();
        self.catalogs
            .iter()
            .fold(CatalogBuilder::new(), |builder, path| {
                builder.from_file(base.join(path))
            })
            .with_aspects(self.aspects.iter().cloned())
    }
}
