//! Comprehensive unit tests for config.rs module

use std::fs;

use media_gallery::config::{AppConfig, CatalogConfig, DatabaseConfig, LoggingConfig};
use tempfile::TempDir;

#[test]
fn test_default_config_values() {
    let config = AppConfig::default();

    assert_eq!(config.database.url, "sqlite:data/media_gallery.db");
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.database.connection_timeout_secs, 30);
}

#[test]
fn test_default_logging_config() {
    let config = AppConfig::default();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_default_catalog_config() {
    let config = AppConfig::default();

    assert_eq!(config.catalog.default_page_size, 100);
    assert_eq!(config.catalog.default_search_limit, 20);
    assert!(config.catalog.strict_review_targets);
}

#[test]
fn test_validate_default_config() {
    assert!(AppConfig::default().validate().is_ok());
}

#[test]
fn test_validate_zero_connection_timeout() {
    let config = AppConfig {
        database: DatabaseConfig {
            connection_timeout_secs: 0,
            ..DatabaseConfig::default()
        },
        ..AppConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_unsupported_database_url() {
    let config = AppConfig {
        database: DatabaseConfig {
            url: "postgres://localhost/gallery".to_string(),
            ..DatabaseConfig::default()
        },
        ..AppConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_invalid_log_level() {
    let config = AppConfig {
        logging: LoggingConfig {
            level: "loud".to_string(),
            ..LoggingConfig::default()
        },
        ..AppConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_invalid_log_format() {
    let config = AppConfig {
        logging: LoggingConfig {
            format: "xml".to_string(),
            ..LoggingConfig::default()
        },
        ..AppConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_zero_search_limit() {
    let config = AppConfig {
        catalog: CatalogConfig {
            default_search_limit: 0,
            ..CatalogConfig::default()
        },
        ..AppConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_load_from_file_overrides_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("gallery.toml");
    fs::write(
        &path,
        r#"
[database]
url = "sqlite::memory:"

[catalog]
strict_review_targets = false
default_search_limit = 5
"#,
    )
    .expect("Failed to write config file");

    let config = AppConfig::load_from(Some(&path)).expect("Failed to load configuration");
    assert_eq!(config.database.url, "sqlite::memory:");
    assert_eq!(config.database.max_connections, 10);
    assert!(!config.catalog.strict_review_targets);
    assert_eq!(config.catalog.default_search_limit, 5);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_load_from_missing_file_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("absent.toml");
    assert!(AppConfig::load_from(Some(&path)).is_err());
}

#[test]
fn test_load_from_rejects_invalid_values() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("bad.toml");
    fs::write(&path, "[database]\nmax_connections = 0\n").expect("Failed to write config file");

    assert!(AppConfig::load_from(Some(&path)).is_err());
}
