//! Data models for the media catalog
//!
//! Each entity kind has three shapes: the stored record (`Photo`), the
//! creation payload (`NewPhoto`) and a partial update (`PhotoPatch`) where
//! every `None` field is left untouched. Nullable columns take
//! `Option<Option<T>>` in a patch: `Some(None)` clears the stored value.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::GalleryError;

/// The six entity kinds stored by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Photo records
    Photo,
    /// Video records
    Video,
    /// Book records
    Book,
    /// User documents
    Document,
    /// Characters linked to media
    Character,
    /// Numeric reviews of media
    Review,
}

impl EntityKind {
    /// All kinds, in the order statistics are reported
    pub const ALL: [Self; 6] = [
        Self::Photo,
        Self::Video,
        Self::Book,
        Self::Document,
        Self::Character,
        Self::Review,
    ];

    /// Plural kind name used as a key in search results and statistics
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photos",
            Self::Video => "videos",
            Self::Book => "books",
            Self::Document => "documents",
            Self::Character => "characters",
            Self::Review => "reviews",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "photo" | "photos" => Ok(Self::Photo),
            "video" | "videos" => Ok(Self::Video),
            "book" | "books" => Ok(Self::Book),
            "document" | "documents" => Ok(Self::Document),
            "character" | "characters" => Ok(Self::Character),
            "review" | "reviews" => Ok(Self::Review),
            other => Err(GalleryError::validation(format!("unknown entity kind: {other}"))),
        }
    }
}

/// Tag of a reviewable media kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Photo
    Photo,
    /// Video
    Video,
    /// Book
    Book,
    /// User document
    Document,
}

impl MediaType {
    /// Tag as stored in the `reviews.media_type` column
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Book => "book",
            Self::Document => "document",
        }
    }

    /// Entity kind the tag points into
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Photo => EntityKind::Photo,
            Self::Video => EntityKind::Video,
            Self::Book => EntityKind::Book,
            Self::Document => EntityKind::Document,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" => Ok(Self::Photo),
            "video" => Ok(Self::Video),
            "book" => Ok(Self::Book),
            "document" => Ok(Self::Document),
            other => Err(GalleryError::validation(format!(
                "malformed media_type: {other:?} (expected photo, video, book or document)"
            ))),
        }
    }
}

/// Polymorphic reference from a review to the media item it rates.
///
/// Stored as a `(media_type, media_id)` pair that the store does not check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "media_type", content = "media_id", rename_all = "lowercase")]
pub enum MediaRef {
    /// A photo by id
    Photo(i64),
    /// A video by id
    Video(i64),
    /// A book by id
    Book(i64),
    /// A user document by id
    Document(i64),
}

impl MediaRef {
    /// Build a reference from its stored parts
    #[must_use]
    pub const fn new(media_type: MediaType, media_id: i64) -> Self {
        match media_type {
            MediaType::Photo => Self::Photo(media_id),
            MediaType::Video => Self::Video(media_id),
            MediaType::Book => Self::Book(media_id),
            MediaType::Document => Self::Document(media_id),
        }
    }

    /// Parse an untyped `(tag, id)` pair
    pub fn parse(media_type: &str, media_id: i64) -> Result<Self, GalleryError> {
        Ok(Self::new(media_type.parse()?, media_id))
    }

    /// Tag half of the reference
    #[must_use]
    pub const fn media_type(&self) -> MediaType {
        match self {
            Self::Photo(_) => MediaType::Photo,
            Self::Video(_) => MediaType::Video,
            Self::Book(_) => MediaType::Book,
            Self::Document(_) => MediaType::Document,
        }
    }

    /// Identifier half of the reference
    #[must_use]
    pub const fn media_id(&self) -> i64 {
        match self {
            Self::Photo(id) | Self::Video(id) | Self::Book(id) | Self::Document(id) => *id,
        }
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.media_type(), self.media_id())
    }
}

/// A stored photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Store-assigned identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Path to the externally stored file
    pub file_path: String,
    /// File size in bytes
    pub file_size: i64,
    /// MIME type
    pub file_type: String,
    /// Width in pixels
    pub width: Option<i32>,
    /// Height in pixels
    pub height: Option<i32>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPhoto {
    /// Title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Path to the externally stored file
    pub file_path: String,
    /// File size in bytes
    pub file_size: i64,
    /// MIME type
    pub file_type: String,
    /// Width in pixels
    #[serde(default)]
    pub width: Option<i32>,
    /// Height in pixels
    #[serde(default)]
    pub height: Option<i32>,
}

/// Read a nullable patch field: a missing key stays `None` through
/// `#[serde(default)]`, an explicit `null` becomes `Some(None)`.
#[allow(clippy::option_option)]
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update of a photo
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    /// New file path
    pub file_path: Option<String>,
    /// New file size
    pub file_size: Option<i64>,
    /// New MIME type
    pub file_type: Option<String>,
    /// New width
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub width: Option<Option<i32>>,
    /// New height
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub height: Option<Option<i32>>,
}

/// A stored video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Store-assigned identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Path to the externally stored file
    pub file_path: String,
    /// File size in bytes
    pub file_size: i64,
    /// MIME type
    pub file_type: String,
    /// Width in pixels
    pub width: Option<i32>,
    /// Height in pixels
    pub height: Option<i32>,
    /// Duration in seconds
    pub duration: Option<f64>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVideo {
    /// Title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Path to the externally stored file
    pub file_path: String,
    /// File size in bytes
    pub file_size: i64,
    /// MIME type
    pub file_type: String,
    /// Width in pixels
    #[serde(default)]
    pub width: Option<i32>,
    /// Height in pixels
    #[serde(default)]
    pub height: Option<i32>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Partial update of a video
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    /// New file path
    pub file_path: Option<String>,
    /// New file size
    pub file_size: Option<i64>,
    /// New MIME type
    pub file_type: Option<String>,
    /// New width
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub width: Option<Option<i32>>,
    /// New height
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub height: Option<Option<i32>>,
    /// New duration
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Option<f64>>,
}

/// A stored book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// Author
    pub author: String,
    /// Optional description
    pub description: Option<String>,
    /// Path to the externally stored file
    pub file_path: String,
    /// File size in bytes
    pub file_size: i64,
    /// File format (PDF, EPUB, ...)
    pub file_format: String,
    /// Number of pages
    pub page_count: Option<i32>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    /// Title
    pub title: String,
    /// Author
    pub author: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Path to the externally stored file
    pub file_path: String,
    /// File size in bytes
    pub file_size: i64,
    /// File format (PDF, EPUB, ...)
    pub file_format: String,
    /// Number of pages
    #[serde(default)]
    pub page_count: Option<i32>,
}

/// Partial update of a book
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookPatch {
    /// New title
    pub title: Option<String>,
    /// New author
    pub author: Option<String>,
    /// New description
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    /// New file path
    pub file_path: Option<String>,
    /// New file size
    pub file_size: Option<i64>,
    /// New file format
    pub file_format: Option<String>,
    /// New page count
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub page_count: Option<Option<i32>>,
}

/// A stored user document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    /// Store-assigned identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Path to the externally stored file
    pub file_path: String,
    /// File size in bytes
    pub file_size: i64,
    /// Free-text review written by the owner
    pub review: Option<String>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new user document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserDocument {
    /// Title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Path to the externally stored file
    pub file_path: String,
    /// File size in bytes
    pub file_size: i64,
    /// Free-text review written by the owner
    #[serde(default)]
    pub review: Option<String>,
}

/// Partial update of a user document
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDocumentPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    /// New file path
    pub file_path: Option<String>,
    /// New file size
    pub file_size: Option<i64>,
    /// New review text
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub review: Option<Option<String>>,
}

/// A stored character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Store-assigned identifier
    pub id: i64,
    /// Character name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

/// Data for creating a new character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCharacter {
    /// Character name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update of a character
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterPatch {
    /// New name
    pub name: Option<String>,
    /// New description
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

/// A character together with the media linked to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterWithMedia {
    /// The character record
    #[serde(flatten)]
    pub character: Character,
    /// Linked photos
    pub photos: Vec<Photo>,
    /// Linked videos
    pub videos: Vec<Video>,
    /// Linked books
    pub books: Vec<Book>,
}

/// A stored review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Store-assigned identifier
    pub id: i64,
    /// The reviewed media item
    pub target: MediaRef,
    /// Rating from 1 to 10
    pub rating: i32,
    /// Optional comment
    pub comment: Option<String>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    /// The reviewed media item
    pub target: MediaRef,
    /// Rating from 1 to 10
    pub rating: i32,
    /// Optional comment
    #[serde(default)]
    pub comment: Option<String>,
}

/// Partial update of a review; the target is fixed at creation
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewPatch {
    /// New rating
    pub rating: Option<i32>,
    /// New comment
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub comment: Option<Option<String>>,
}

/// Results of a search across every searchable kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Photos whose title matched
    pub photos: Vec<Photo>,
    /// Videos whose title matched
    pub videos: Vec<Video>,
    /// Books whose title matched
    pub books: Vec<Book>,
    /// Documents whose title matched
    pub documents: Vec<UserDocument>,
    /// Characters whose name matched
    pub characters: Vec<Character>,
}

impl SearchResults {
    /// Total number of hits across all kinds
    #[must_use]
    pub fn total(&self) -> usize {
        self.photos.len()
            + self.videos.len()
            + self.books.len()
            + self.documents.len()
            + self.characters.len()
    }
}

/// Row counts per entity kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Number of photos
    pub photos: u64,
    /// Number of videos
    pub videos: u64,
    /// Number of books
    pub books: u64,
    /// Number of user documents
    pub documents: u64,
    /// Number of characters
    pub characters: u64,
    /// Number of reviews
    pub reviews: u64,
}

impl CatalogStats {
    /// Count for a single kind
    #[must_use]
    pub const fn get(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Photo => self.photos,
            EntityKind::Video => self.videos,
            EntityKind::Book => self.books,
            EntityKind::Document => self.documents,
            EntityKind::Character => self.characters,
            EntityKind::Review => self.reviews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_ref_parse() {
        let target = MediaRef::parse("book", 7).unwrap();
        assert_eq!(target, MediaRef::Book(7));
        assert_eq!(target.media_type(), MediaType::Book);
        assert_eq!(target.media_id(), 7);
    }

    #[test]
    fn test_media_ref_rejects_unknown_tag() {
        let err = MediaRef::parse("audio", 1).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_media_ref_json_shape() {
        let json = serde_json::to_value(MediaRef::Photo(5)).unwrap();
        assert_eq!(json, serde_json::json!({"media_type": "photo", "media_id": 5}));
    }

    #[test]
    fn test_entity_kind_accepts_singular_and_plural() {
        assert_eq!("photo".parse::<EntityKind>().unwrap(), EntityKind::Photo);
        assert_eq!("Documents".parse::<EntityKind>().unwrap(), EntityKind::Document);
        assert!("albums".parse::<EntityKind>().is_err());
    }
}
