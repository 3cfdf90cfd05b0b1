//! Command catalogs and session configuration for field-prompt.
//!
//! A [`Catalog`] maps command names to the [`FieldSchema`] of their
//! arguments and carries the aspect names a deployment knows about. Catalogs
//! are read from YAML or JSON files and can be merged with a
//! [`CatalogBuilder`]. A [`SessionConfig`] names the catalogs an interactive
//! session starts with.
//!
//! # Quick start
//!
//! ```no_run
//! use field_prompt_catalog::{Catalog, SessionConfig};
//!
//! // Load one catalog file
//! let catalog = Catalog::from_file("catalogs/base.yaml").unwrap();
//! if let Some(command) = catalog.get("recruit") {
//!     println!("recruit takes a {}", command.schema.kind.type_name());
//! }
//!
//! // Or everything a session config lists
//! let config = SessionConfig::load_or_default("field-prompt.yml").unwrap();
//! let catalog = config.catalog_builder(".").build().unwrap();
//! ```
//!
//! [`FieldSchema`]: field_prompt_core::FieldSchema

mod config;
mod error;
mod loader;

pub use config::SessionConfig;
pub use error::{CatalogError, Result};
pub use loader::{Catalog, CatalogBuilder, CatalogFile, CatalogFormat, CatalogSource, CommandSpec};
