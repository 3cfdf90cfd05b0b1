//! Error types for catalog and session configuration loading.
//!
//! Covers I/O and (de)serialization failures plus catalog content that parses
//! but cannot be used.

use thiserror::Error;

/// Errors that can occur while loading catalogs or configuration.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// No command with this name is registered.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The same command name appears twice in one catalog file.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),

    /// Catalog content is structurally valid but unusable (e.g. a bad
    /// delimiter pattern or an empty command name).
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Every configured catalog source failed to load.
    #[error("no catalog sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
