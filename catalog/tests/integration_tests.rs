use std::path::{Path, PathBuf};

use field_prompt_catalog::{
    Catalog, CatalogError, CatalogFile, CommandSpec, SessionConfig,
};
use field_prompt_core::{
    AspectRegistry, FieldSchema, ScriptedTerminal, resolve, validate, validation_message,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn recruit_schema() -> FieldSchema {
    FieldSchema::object("recruit")
        .with_field(
            "follower",
            FieldSchema::string("follower")
                .with_autocomplete(["Neville", "Enid", "Dorothy"])
                .strict(),
        )
        .with_field("wage", FieldSchema::integer("wage").with_min(0).with_max(10))
        .with_field(
            "talents",
            FieldSchema::aspect_map("talents").with_count_bounds(Some(1), None),
        )
}

fn sample_file() -> CatalogFile {
    CatalogFile {
        version: "1.0".into(),
        aspects: vec!["forge".into(), "heart".into(), "lore.edge".into()],
        commands: vec![
            CommandSpec::new("recruit", recruit_schema()).with_description("Hire a follower"),
            CommandSpec::new("rest", FieldSchema::boolean("rest")),
        ],
    }
}

fn write_yaml(dir: &Path, name: &str, file: &CatalogFile) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_yaml::to_string(file).unwrap()).unwrap();
    path
}

fn write_json(dir: &Path, name: &str, file: &CatalogFile) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(file).unwrap()).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_yaml_and_json_files_load_identically() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = Catalog::from_file(write_yaml(dir.path(), "c.yaml", &sample_file())).unwrap();
    let json = Catalog::from_file(write_json(dir.path(), "c.json", &sample_file())).unwrap();

    assert_eq!(
        yaml.commands().collect::<Vec<_>>(),
        json.commands().collect::<Vec<_>>()
    );
    assert_eq!(yaml.get("recruit"), json.get("recruit"));
    assert_eq!(yaml.aspects(), json.aspects());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Catalog::from_file(dir.path().join("absent.yaml")),
        Err(CatalogError::IoError(_))
    ));
}

#[test]
fn test_malformed_yaml_is_yaml_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "commands: [ {name: rest").unwrap();
    assert!(matches!(
        Catalog::from_file(&path),
        Err(CatalogError::YamlError(_))
    ));
}

// ---------------------------------------------------------------------------
// Catalog-driven validation and prompting
// ---------------------------------------------------------------------------

#[test]
fn test_catalog_aspects_drive_validation() {
    let catalog = Catalog::parse(
        &serde_json::to_string(&sample_file()).unwrap(),
        field_prompt_catalog::CatalogFormat::Json,
    )
    .unwrap();
    let schema = &catalog.require("recruit").unwrap().schema;

    let good = json!({ "follower": "Enid", "wage": 3, "talents": { "lore.edge": 2 } });
    assert_eq!(validate(&good, schema, catalog.aspects()), Ok(()));

    let bad = json!({ "follower": "Enid", "wage": 3, "talents": { "lore.moth": 2 } });
    assert_eq!(
        validation_message(&bad, schema, catalog.aspects()),
        "[talents] lore.moth is not a valid aspect"
    );
}

#[test]
fn test_resolve_with_catalog_schema() {
    let catalog = Catalog::parse(
        &serde_yaml::to_string(&sample_file()).unwrap(),
        field_prompt_catalog::CatalogFormat::Yaml,
    )
    .unwrap();
    let spec = catalog.require("recruit").unwrap();

    let mut terminal = ScriptedTerminal::new(["dor", "4", "lore", "1", ""]);
    let value = resolve("", &spec.schema, catalog.aspects(), &mut terminal).unwrap();
    assert_eq!(
        value,
        json!({ "follower": "Dorothy", "wage": 4, "talents": { "lore.edge": 1 } })
    );
}

// ---------------------------------------------------------------------------
// Session config
// ---------------------------------------------------------------------------

#[test]
fn test_session_config_builds_catalog_relative_to_base() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("catalogs")).unwrap();
    write_yaml(&dir.path().join("catalogs"), "base.yaml", &sample_file());

    let extra = CatalogFile {
        aspects: vec!["moth".into()],
        commands: vec![CommandSpec::new("pray", FieldSchema::string("pray"))],
        ..CatalogFile::default()
    };
    write_json(dir.path(), "extra.json", &extra);

    let config = SessionConfig {
        catalogs: vec!["catalogs/base.yaml".into(), "extra.json".into()],
        aspects: vec!["winter".into()],
        ..SessionConfig::default()
    };
    let config_path = dir.path().join("session.yml");
    std::fs::write(&config_path, serde_yaml::to_string(&config).unwrap()).unwrap();

    let loaded = SessionConfig::load(&config_path).unwrap();
    let catalog = loaded.catalog_builder(dir.path()).build().unwrap();

    assert_eq!(catalog.commands().collect::<Vec<_>>(), ["pray", "recruit", "rest"]);
    for aspect in ["forge", "moth", "winter"] {
        assert!(catalog.aspects().exists(aspect), "missing aspect {aspect}");
    }
}

#[test]
fn test_session_config_without_catalogs_has_no_sources() {
    let config = SessionConfig::default();
    assert!(matches!(
        config.catalog_builder(".").build(),
        Err(CatalogError::NoSourcesAvailable)
    ));
}
