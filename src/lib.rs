//! Media Gallery - Media Catalog Backend
//!
//! A Rust library for cataloging photos, videos, books and user documents in
//! SQLite, linking them to characters and rating them with reviews.
//!
//! # Features
//!
//! - One generic CRUD repository reused for all six entity kinds
//! - Character to media links in both directions
//! - Reviews that point at any media kind through a typed reference
//! - Case-insensitive substring search and per-kind statistics
//! - Layered configuration, structured logging and operation metrics
//!
//! ```no_run
//! use media_gallery::{Catalog, Database};
//!
//! # fn main() -> media_gallery::error::Result<()> {
//! let catalog = Catalog::new(Database::new("sqlite:data/media_gallery.db")?);
//! let hits = catalog.search_all("Harry", 20)?;
//! println!("{} matches", hits.total());
//! # Ok(())
//! # }
//! ```

/// Catalog façade: global search, statistics and review policy
pub mod catalog;
/// Character and media links
pub mod characters;
/// Configuration management
pub mod config;
/// Database operations and connection pooling
pub mod db;
/// Error types
pub mod error;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Entity implementations for every stored kind
pub mod records;
/// Generic repository engine
pub mod repository;
/// Review queries
pub mod reviews;
/// Database schema definitions
pub mod schema;
/// Title, name and author search
pub mod search;
/// Sample data seeding
pub mod seed;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use catalog::Catalog;
pub use characters::CharacterMedia;
pub use db::Database;
pub use error::{GalleryError, Result};
pub use models::{
    Book, CatalogStats, Character, CharacterWithMedia, EntityKind, MediaRef, MediaType, Photo,
    Review, SearchResults, UserDocument, Video,
};
pub use repository::{Entity, Repository};
pub use search::Searchable;
