//! Layered loading and YAML store lifecycle

use partial_date::{
    Component, ConfigStore, FormatSettings, PartialDateField, PartialDateFormatter,
    PartialDateValue, FORMAT_CONFIG, SETTINGS_CONFIG,
};
use partial_date_config::{ConfigLoader, FileDiscovery, YamlConfigStore};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn project_loader(project: &TempDir) -> ConfigLoader {
    ConfigLoader::with_discovery(FileDiscovery::with_directories(
        None,
        Some(project.path().to_path_buf()),
    ))
}

#[test]
#[serial]
fn test_environment_overrides_files() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join("partial_date.yaml"),
        r#"
settings:
  field_defaults:
    hide_blank_items: true
format:
  date_separator: "/"
  approximate_prefix: "c. "
"#,
    )
    .unwrap();

    std::env::set_var("PARTIAL_DATE_FORMAT__DATE_SEPARATOR", ".");
    std::env::set_var("PARTIAL_DATE_SETTINGS__FIELD_DEFAULTS__HIDE_BLANK_ITEMS", "false");

    let config = project_loader(&project).load();

    std::env::remove_var("PARTIAL_DATE_FORMAT__DATE_SEPARATOR");
    std::env::remove_var("PARTIAL_DATE_SETTINGS__FIELD_DEFAULTS__HIDE_BLANK_ITEMS");

    let config = config.unwrap();
    assert_eq!(config.format.date_separator, ".");
    assert_eq!(config.format.approximate_prefix, "c. ");
    assert!(!config.settings.field_defaults.hide_blank_items);
}

#[test]
#[serial]
fn test_without_env_ignores_environment() {
    let project = TempDir::new().unwrap();
    std::env::set_var("PARTIAL_DATE_FORMAT__DATE_SEPARATOR", ".");

    let format = project_loader(&project).without_env().load_format();

    std::env::remove_var("PARTIAL_DATE_FORMAT__DATE_SEPARATOR");
    assert_eq!(format.unwrap(), FormatSettings::default());
}

#[test]
#[serial]
fn test_published_config_drives_field_and_formatter() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join("partial_date.toml"),
        r#"
[settings.field_defaults.minimum_components]
from_granularity_year = true

[format]
date_separator = "/"
"#,
    )
    .unwrap();
    let store_dir = TempDir::new().unwrap();
    let store = YamlConfigStore::new(store_dir.path());

    let config = project_loader(&project).without_env().publish(&store).unwrap();
    assert!(store_dir.path().join("partial_date.settings.yaml").is_file());
    assert!(store_dir.path().join("partial_date.format.yaml").is_file());

    let stored_format: FormatSettings =
        serde_json::from_value(store.load(FORMAT_CONFIG).unwrap().unwrap()).unwrap();
    assert_eq!(stored_format, config.format);

    let field = PartialDateField::new(config.settings.field_defaults.clone());
    let mut value = PartialDateValue::new();
    assert!(field.validate(&value).is_err());
    value.set_year(Some(1848)).unwrap();
    value.set_numeric(Component::Month, Some(2)).unwrap();
    assert!(field.validate(&value).is_ok());
    assert_eq!(PartialDateFormatter::new(&stored_format).format(&value), "1848/02");

    field.delete(&store).unwrap();
    field.delete(&store).unwrap();
    assert_eq!(store.load(SETTINGS_CONFIG).unwrap(), None);
    assert_eq!(store.load(FORMAT_CONFIG).unwrap(), None);
}
