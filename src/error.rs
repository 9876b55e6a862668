//! Error types for the media-gallery library.
//!
//! Absence is not an error here: lookups on a missing identifier return
//! `Ok(None)` or an empty `Vec`. The variants below cover caller mistakes
//! (`Validation`) and failures of the persistent layer.

use thiserror::Error;

/// Errors that can occur in the media-gallery application.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// Caller-supplied data violates a constraint; raised before any mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A statement or commit against the store failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] rusqlite::Error),

    /// No pooled connection could be acquired
    #[error("Store unavailable: connection pool: {0}")]
    PoolUnavailable(#[from] r2d2::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GalleryError {
    /// Shorthand for building a [`GalleryError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for failures of the persistent layer (statement, commit or pool).
    #[must_use]
    pub const fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::PoolUnavailable(_))
    }

    /// True when the caller supplied invalid data.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Convenience type alias for Result with `GalleryError`
pub type Result<T> = std::result::Result<T, GalleryError>;

impl From<config::ConfigError> for GalleryError {
    fn from(err: config::ConfigError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
