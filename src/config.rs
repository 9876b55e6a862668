use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, Result};
use crate::validation::{InputValidator, MAX_PAGE_SIZE};

/// Application configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Store location and pool settings
    pub database: DatabaseConfig,
    /// Log level, format and optional file output
    pub logging: LoggingConfig,
    /// Catalog behavior
    pub catalog: CatalogConfig,
}

/// Store location and pool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `sqlite:<path>`, `sqlite://<path>` or `sqlite::memory:`
    pub url: String,
    /// Upper bound of pooled connections
    pub max_connections: u32,
    /// How long to wait for a pooled connection
    pub connection_timeout_secs: u64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset
    pub level: String,
    /// Optional log file; rotated daily
    pub file_path: Option<String>,
    /// "json" or "text"
    pub format: String,
}

/// Catalog behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Page size used when a caller does not pass one
    pub default_page_size: u32,
    /// Per-kind limit used by search when a caller does not pass one
    pub default_search_limit: u32,
    /// Reject reviews whose target media item does not exist
    pub strict_review_targets: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/media_gallery.db".to_string(),
            max_connections: 10,
            connection_timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            format: "text".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_page_size: 100,
            default_search_limit: 20,
            strict_review_targets: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default locations and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from multiple sources with precedence.
    ///
    /// Later sources win: built-in defaults, `config/default.*`,
    /// `config/local.*`, the explicit `path`, then `MEDIA_GALLERY__*`
    /// environment variables such as `MEDIA_GALLERY__DATABASE__URL`.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            // Start with default values
            .add_source(Config::try_from(&Self::default())?)
            // Add config files if they exist
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            // Add environment variables with prefix
            .add_source(
                Environment::with_prefix("MEDIA_GALLERY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate database config
        InputValidator::validate_database_url(&self.database.url)?;
        if self.database.max_connections == 0 {
            return Err(GalleryError::InvalidConfig(
                "max_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.connection_timeout_secs == 0 {
            return Err(GalleryError::InvalidConfig(
                "connection_timeout_secs must be greater than 0".to_string(),
            ));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(GalleryError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(GalleryError::InvalidConfig(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format, valid_formats
            )));
        }

        // Validate catalog config
        for (name, value) in [
            ("default_page_size", self.catalog.default_page_size),
            ("default_search_limit", self.catalog.default_search_limit),
        ] {
            if value == 0 || value > MAX_PAGE_SIZE {
                return Err(GalleryError::InvalidConfig(format!(
                    "{name} must be between 1 and {MAX_PAGE_SIZE}, got {value}"
                )));
            }
        }

        Ok(())
    }

    /// Get database URL from environment or config
    #[must_use]
    pub fn get_database_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.database.url.clone())
    }
}
