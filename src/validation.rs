use std::path::Path;

use crate::error::{GalleryError, Result};

/// Lowest accepted review rating
pub const MIN_RATING: i32 = 1;
/// Highest accepted review rating
pub const MAX_RATING: i32 = 10;
/// Upper bound applied to every page or search limit
pub const MAX_PAGE_SIZE: u32 = 1000;

const MAX_TITLE_LEN: usize = 500;
const MAX_PATH_LEN: usize = 4096;

/// Validation utilities run at the boundary, before any mutation is attempted
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a required short text field such as a title, author or name
    pub fn validate_title(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(GalleryError::validation(format!("{field} cannot be empty")));
        }

        if value.chars().count() > MAX_TITLE_LEN {
            return Err(GalleryError::validation(format!(
                "{field} too long (max {MAX_TITLE_LEN} characters)"
            )));
        }

        if value.contains('\0') || value.contains('\r') || value.contains('\n') {
            return Err(GalleryError::validation(format!("{field} contains invalid characters")));
        }

        Ok(())
    }

    /// Validate a file path pointing at externally stored content
    pub fn validate_file_path(path: &str) -> Result<()> {
        if path.trim().is_empty() {
            return Err(GalleryError::validation("file_path cannot be empty"));
        }

        if path.len() > MAX_PATH_LEN {
            return Err(GalleryError::validation(format!(
                "file_path too long (max {MAX_PATH_LEN} characters)"
            )));
        }

        // Reject path traversal
        if Path::new(path).components().any(|c| matches!(c, std::path::Component::ParentDir)) {
            return Err(GalleryError::validation("file_path must not contain '..' segments"));
        }

        if path.contains('\0') {
            return Err(GalleryError::validation("file_path contains invalid characters"));
        }

        Ok(())
    }

    /// Validate a file size in bytes
    pub fn validate_file_size(size: i64) -> Result<()> {
        if size < 0 {
            return Err(GalleryError::validation("file_size cannot be negative"));
        }
        Ok(())
    }

    /// Validate an optional non-negative integer attribute (width, height, page count)
    pub fn validate_non_negative(field: &str, value: Option<i32>) -> Result<()> {
        match value {
            Some(v) if v < 0 => Err(GalleryError::validation(format!("{field} cannot be negative"))),
            _ => Ok(()),
        }
    }

    /// Validate a video duration in seconds
    pub fn validate_duration(duration: Option<f64>) -> Result<()> {
        match duration {
            Some(d) if !d.is_finite() || d < 0.0 => Err(GalleryError::validation(
                "duration must be a finite, non-negative number of seconds",
            )),
            _ => Ok(()),
        }
    }

    /// Validate a review rating, inclusive range 1 to 10
    pub fn validate_rating(rating: i32) -> Result<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(GalleryError::validation(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
            )));
        }
        Ok(())
    }

    /// Validate a media identifier
    pub fn validate_id(field: &str, id: i64) -> Result<()> {
        if id <= 0 {
            return Err(GalleryError::validation(format!("{field} must be positive, got {id}")));
        }
        Ok(())
    }

    /// Validate a page or search limit and clamp it to [`MAX_PAGE_SIZE`]
    pub fn validate_limit(limit: u32) -> Result<u32> {
        if limit == 0 {
            return Err(GalleryError::validation("limit must be greater than 0"));
        }

        if limit > MAX_PAGE_SIZE {
            tracing::debug!(limit, cap = MAX_PAGE_SIZE, "Clamping limit");
        }

        Ok(limit.min(MAX_PAGE_SIZE))
    }

    /// Strip control characters from free text, keeping line breaks and tabs
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t' || *c == '\r')
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// Validate database URL
    pub fn validate_database_url(url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(GalleryError::InvalidConfig("Database URL cannot be empty".to_string()));
        }

        if url.contains("://") && !url.starts_with("sqlite://") {
            return Err(GalleryError::InvalidConfig("Only SQLite databases are supported".to_string()));
        }

        if url.len() > 1000 {
            return Err(GalleryError::InvalidConfig("Database URL too long".to_string()));
        }

        Ok(())
    }
}
