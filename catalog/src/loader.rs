//! Command catalog loading with builder pattern and fallback chains.
//!
//! A catalog file declares the aspect names of a deployment and the argument
//! schema of each command:
//!
//! ```yaml
//! version: "1.0"
//! aspects: [forge, heart, lore.edge, lore.moth]
//! commands:
//!   - name: recruit
//!     description: Hire a follower
//!     schema:
//!       name: recruit
//!       type: object
//!       fields:
//!         - key: follower
//!           schema: { name: follower, type: string }
//!         - key: wage
//!           schema: { name: wage, type: integer, min: 0 }
//! ```
//!
//! Files ending in `.yaml` / `.yml` are read as YAML, anything else as JSON.
//!
//! ```no_run
//! use field_prompt_catalog::Catalog;
//!
//! // Load a single file
//! let catalog = Catalog::from_file("catalogs/base.yaml").unwrap();
//! assert!(catalog.get("recruit").is_some());
//!
//! // Merge several files; later files override earlier commands
//! let catalog = Catalog::builder()
//!     .from_file("catalogs/base.yaml")
//!     .from_file("catalogs/expansion.json")
//!     .build()
//!     .unwrap();
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use field_prompt_core::{AspectSet, FieldSchema};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};

/// One command and the schema of its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: FieldSchema,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, schema: FieldSchema) -> Self {
        Self {
            name: name.into(),
            description: None,
            schema,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// On-disk layout of a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub aspects: Vec<String>,
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Serialization format of a catalog file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    /// `.yaml` and `.yml` select YAML; everything else is JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_prompt_catalog::CatalogFormat;
    ///
    /// assert_eq!(CatalogFormat::from_path("base.YML"), CatalogFormat::Yaml);
    /// assert_eq!(CatalogFormat::from_path("base.json"), CatalogFormat::Json);
    /// assert_eq!(CatalogFormat::from_path("catalog"), CatalogFormat::Json);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Describes where a [`Catalog`] was loaded from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// Loaded from one catalog file.
    File(PathBuf),
    /// Parsed from in-memory text.
    Inline,
    /// Merged from a chain of sources.
    Multiple(Vec<CatalogSource>),
}

/// Commands and aspect names available to a session.
///
/// Commands are kept sorted by name so listings are stable.
///
/// # Examples
///
/// ```
/// use field_prompt_catalog::{Catalog, CatalogFormat};
/// use field_prompt_core::AspectRegistry;
///
/// let text = r#"{
///     "aspects": ["forge", "heart"],
///     "commands": [{ "name": "rest", "schema": { "name": "rest", "type": "boolean" } }]
/// }"#;
/// let catalog = Catalog::parse(text, CatalogFormat::Json).unwrap();
/// assert_eq!(catalog.commands().collect::<Vec<_>>(), ["rest"]);
/// assert!(catalog.aspects().exists("forge"));
/// ```
#[derive(Debug)]
pub struct Catalog {
    commands: BTreeMap<String, CommandSpec>,
    aspects: AspectSet,
    source: CatalogSource,
}

impl Catalog {
    /// Returns a new [`CatalogBuilder`] for configuring a fallback chain.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Creates an empty catalog.
    pub fn empty() -> Self {
        Self {
            commands: BTreeMap::new(),
            aspects: AspectSet::new(),
            source: CatalogSource::Inline,
        }
    }

    /// Loads a catalog file, picking the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IoError`] if the file cannot be read,
    /// [`CatalogError::JsonError`] / [`CatalogError::YamlError`] if parsing
    /// fails, and the errors of [`from_catalog_file`](Self::from_catalog_file)
    /// for unusable content.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut catalog = Self::parse(&text, CatalogFormat::from_path(path))?;
        catalog.source = CatalogSource::File(path.to_path_buf());
        debug!(
            path = %path.display(),
            commands = catalog.len(),
            aspects = catalog.aspects.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Parses catalog text in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::JsonError`] / [`CatalogError::YamlError`] if
    /// parsing fails, and the errors of
    /// [`from_catalog_file`](Self::from_catalog_file) for unusable content.
    pub fn parse(text: &str, format: CatalogFormat) -> Result<Self> {
        let file: CatalogFile = match format {
            CatalogFormat::Json => serde_json::from_str(text)?,
            CatalogFormat::Yaml => serde_yaml::from_str(text)?,
        };
        Self::from_catalog_file(file)
    }

    /// Builds a catalog from already-deserialized content.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateCommand`] if a command name appears
    /// twice, or [`CatalogError::InvalidCatalog`] for an empty command name
    /// or a delimiter pattern that does not compile.
    pub fn from_catalog_file(file: CatalogFile) -> Result<Self> {
        let mut seen = HashSet::new();
        for command in &file.commands {
            if command.name.trim().is_empty() {
                return Err(CatalogError::InvalidCatalog(
                    "command name is empty".to_string(),
                ));
            }
            if !seen.insert(command.name.as_str()) {
                return Err(CatalogError::DuplicateCommand(command.name.clone()));
            }
            command.schema.check_delimiters().map_err(|err| {
                CatalogError::InvalidCatalog(format!("command {}: {err}", command.name))
            })?;
        }

        Ok(Self {
            commands: file
                .commands
                .into_iter()
                .map(|command| (command.name.clone(), command))
                .collect(),
            aspects: file.aspects.into_iter().collect(),
            source: CatalogSource::Inline,
        })
    }

    /// Looks up a command by name.
    pub fn get(&self, command: &str) -> Option<&CommandSpec> {
        self.commands.get(command)
    }

    /// Looks up a command by name, failing if it is not registered.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownCommand`] if no such command exists.
    pub fn require(&self, command: &str) -> Result<&CommandSpec> {
        self.get(command)
            .ok_or_else(|| CatalogError::UnknownCommand(command.to_string()))
    }

    /// Inserts a command, replacing any existing entry with the same name.
    pub fn insert(&mut self, spec: CommandSpec) {
        self.commands.insert(spec.name.clone(), spec);
    }

    /// Returns `true` if the catalog registers `command`.
    pub fn contains(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }

    /// Returns the number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the command names in sorted order.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Returns the command specs in name order.
    pub fn specs(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    /// Known aspect names, usable as an
    /// [`AspectRegistry`](field_prompt_core::AspectRegistry).
    pub fn aspects(&self) -> &AspectSet {
        &self.aspects
    }

    /// Adds aspect names to the registry.
    pub fn extend_aspects<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aspects.extend(names);
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    fn merge(&mut self, other: Catalog) {
        for (name, spec) in other.commands {
            if self.commands.insert(name.clone(), spec).is_some() {
                debug!(command = %name, "Command overridden by later catalog");
            }
        }
        self.aspects.extend(other.aspects.iter());
    }
}

/// Builder merging several catalog files into one [`Catalog`].
///
/// Sources are loaded in the order they are added. A source that fails to
/// load is logged and skipped; later sources override commands of earlier
/// ones. If every source fails, [`CatalogError::NoSourcesAvailable`] is
/// returned.
///
/// # Example
///
/// ```no_run
/// use field_prompt_catalog::Catalog;
///
/// let catalog = Catalog::builder()
///     .from_file("/etc/field-prompt/base.yaml")
///     .from_file("local.json")
///     .with_aspects(["winter"])
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    sources: Vec<PathBuf>,
    aspects: Vec<String>,
}

impl CatalogBuilder {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a catalog file as a source.
    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(path.into());
        self
    }

    /// Adds aspect names on top of those the catalogs declare.
    pub fn with_aspects<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aspects.extend(names.into_iter().map(Into::into));
        self
    }

    /// Loads and merges the configured sources.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NoSourcesAvailable`] if no source is
    /// configured or none of them loads.
    pub fn build(self) -> Result<Catalog> {
        let mut merged: Option<Catalog> = None;
        let mut loaded = Vec::new();

        for path in &self.sources {
            match Catalog::from_file(path) {
                Ok(catalog) => {
                    loaded.push(CatalogSource::File(path.clone()));
                    match merged.as_mut() {
                        Some(existing) => existing.merge(catalog),
                        None => merged = Some(catalog),
                    }
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Skipping catalog");
                }
            }
        }

        let mut catalog = merged.ok_or(CatalogError::NoSourcesAvailable)?;
        catalog.extend_aspects(self.aspects);
        catalog.source = CatalogSource::Multiple(loaded);
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_prompt_core::AspectRegistry;

    fn yaml_catalog() -> &'static str {
        r#"
version: "1.0"
aspects: [forge, heart, lore.edge]
commands:
  - name: rest
    description: Skip a season
    schema: { name: rest, type: boolean, default: true }
  - name: study
    schema:
      name: study
      type: object
      fields:
        - key: lore
          schema: { name: lore, type: aspectMap, minDistinctKeys: 1 }
"#
    }

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_parse_yaml() {
        let catalog = Catalog::parse(yaml_catalog(), CatalogFormat::Yaml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("rest").unwrap().description.as_deref(),
            Some("Skip a season")
        );
        assert!(catalog.aspects().exists("lore.edge"));
        assert!(!catalog.aspects().exists("lore"));
    }

    #[test]
    fn test_duplicate_command_rejected() {
        let text = r#"{"commands": [
            {"name": "rest", "schema": {"name": "rest", "type": "boolean"}},
            {"name": "rest", "schema": {"name": "rest", "type": "integer"}}
        ]}"#;
        assert!(matches!(
            Catalog::parse(text, CatalogFormat::Json),
            Err(CatalogError::DuplicateCommand(name)) if name == "rest"
        ));
    }

    #[test]
    fn test_bad_delimiter_rejected_at_load() {
        let text = r#"{"commands": [
            {"name": "pick", "schema": {"name": "pick", "type": "string", "delimiter": "["}}
        ]}"#;
        assert!(matches!(
            Catalog::parse(text, CatalogFormat::Json),
            Err(CatalogError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_empty_command_name_rejected() {
        let text = r#"{"commands": [{"name": " ", "schema": {"name": "x", "type": "boolean"}}]}"#;
        assert!(matches!(
            Catalog::parse(text, CatalogFormat::Json),
            Err(CatalogError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_unknown_tag_is_parse_error() {
        let text = r#"{"commands": [{"name": "x", "schema": {"name": "x", "type": "float"}}]}"#;
        assert!(matches!(
            Catalog::parse(text, CatalogFormat::Json),
            Err(CatalogError::JsonError(_))
        ));
    }

    #[test]
    fn test_require_unknown_command() {
        let catalog = Catalog::empty();
        assert!(matches!(
            catalog.require("rest"),
            Err(CatalogError::UnknownCommand(name)) if name == "rest"
        ));
    }

    #[test]
    fn test_commands_sorted() {
        let mut catalog = Catalog::empty();
        catalog.insert(CommandSpec::new("zeta", FieldSchema::boolean("zeta")));
        catalog.insert(CommandSpec::new("alpha", FieldSchema::boolean("alpha")));
        assert_eq!(catalog.commands().collect::<Vec<_>>(), ["alpha", "zeta"]);
        assert!(catalog.contains("alpha"));
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "base.yml", yaml_catalog());
        let catalog = Catalog::from_file(&path).unwrap();
        assert!(catalog.contains("study"));
        assert!(matches!(catalog.source(), CatalogSource::File(p) if *p == path));
    }

    #[test]
    fn test_builder_merges_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let base = write(dir.path(), "base.yaml", yaml_catalog());
        let extra = write(
            dir.path(),
            "extra.json",
            r#"{"aspects": ["moth"], "commands": [
                {"name": "rest", "schema": {"name": "rest", "type": "integer"}}
            ]}"#,
        );

        let catalog = Catalog::builder()
            .from_file(&base)
            .from_file(&extra)
            .with_aspects(["winter"])
            .build()
            .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("rest").unwrap().schema.kind.type_name(), "integer");
        assert!(catalog.aspects().exists("moth"));
        assert!(catalog.aspects().exists("forge"));
        assert!(catalog.aspects().exists("winter"));
    }

    #[test]
    fn test_builder_skips_failed_source() {
        let dir = tempfile::tempdir().unwrap();
        let base = write(dir.path(), "base.yaml", yaml_catalog());

        let catalog = Catalog::builder()
            .from_file("/nonexistent/catalog.json")
            .from_file(&base)
            .build()
            .unwrap();
        assert!(catalog.contains("rest"));
        assert!(matches!(catalog.source(), CatalogSource::Multiple(s) if s.len() == 1));
    }

    #[test]
    fn test_builder_all_fail() {
        let result = Catalog::builder()
            .from_file("/nonexistent/a.json")
            .from_file("/nonexistent/b.yaml")
            .build();
        assert!(matches!(result, Err(CatalogError::NoSourcesAvailable)));
        assert!(matches!(
            CatalogBuilder::new().build(),
            Err(CatalogError::NoSourcesAvailable)
        ));
    }
}
