//! Database schema definitions
//!
//! Constants for table and column names used with rusqlite. The DDL itself
//! lives in `migrations/`.

/// Photos table schema
pub mod photos {
    /// Table name
    pub const TABLE: &str = "photos";
    /// Primary key column
    pub const ID: &str = "id";
    /// Title column
    pub const TITLE: &str = "title";
    /// Optional description column
    pub const DESCRIPTION: &str = "description";
    /// Path to the stored binary
    pub const FILE_PATH: &str = "file_path";
    /// File size in bytes column
    pub const FILE_SIZE: &str = "file_size";
    /// MIME type column
    pub const FILE_TYPE: &str = "file_type";
    /// Width in pixels column
    pub const WIDTH: &str = "width";
    /// Height in pixels column
    pub const HEIGHT: &str = "height";
    /// Creation timestamp column
    pub const CREATED_AT: &str = "created_at";
}

/// Videos table schema
pub mod videos {
    /// Table name
    pub const TABLE: &str = "videos";
    /// Primary key column
    pub const ID: &str = "id";
    /// Title column
    pub const TITLE: &str = "title";
    /// Optional description column
    pub const DESCRIPTION: &str = "description";
    /// Path to the stored binary
    pub const FILE_PATH: &str = "file_path";
    /// File size in bytes column
    pub const FILE_SIZE: &str = "file_size";
    /// MIME type column
    pub const FILE_TYPE: &str = "file_type";
    /// Width in pixels column
    pub const WIDTH: &str = "width";
    /// Height in pixels column
    pub const HEIGHT: &str = "height";
    /// Duration in seconds column
    pub const DURATION: &str = "duration";
    /// Creation timestamp column
    pub const CREATED_AT: &str = "created_at";
}

/// Books table schema
pub mod books {
    /// Table name
    pub const TABLE: &str = "books";
    /// Primary key column
    pub const ID: &str = "id";
    /// Title column
    pub const TITLE: &str = "title";
    /// Author column
    pub const AUTHOR: &str = "author";
    /// Optional description column
    pub const DESCRIPTION: &str = "description";
    /// Path to the stored binary
    pub const FILE_PATH: &str = "file_path";
    /// File size in bytes column
    pub const FILE_SIZE: &str = "file_size";
    /// File format column (PDF, EPUB, ...)
    pub const FILE_FORMAT: &str = "file_format";
    /// Page count column
    pub const PAGE_COUNT: &str = "page_count";
    /// Creation timestamp column
    pub const CREATED_AT: &str = "created_at";
}

/// User documents table schema
pub mod user_documents {
    /// Table name
    pub const TABLE: &str = "user_documents";
    /// Primary key column
    pub const ID: &str = "id";
    /// Title column
    pub const TITLE: &str = "title";
    /// Optional description column
    pub const DESCRIPTION: &str = "description";
    /// Path to the stored binary
    pub const FILE_PATH: &str = "file_path";
    /// File size in bytes column
    pub const FILE_SIZE: &str = "file_size";
    /// Free-text review column
    pub const REVIEW: &str = "review";
    /// Creation timestamp column
    pub const CREATED_AT: &str = "created_at";
}

/// Characters table schema
pub mod characters {
    /// Table name
    pub const TABLE: &str = "characters";
    /// Primary key column
    pub const ID: &str = "id";
    /// Character name column
    pub const NAME: &str = "name";
    /// Optional description column
    pub const DESCRIPTION: &str = "description";
}

/// Reviews table schema
pub mod reviews {
    /// Table name
    pub const TABLE: &str = "reviews";
    /// Primary key column
    pub const ID: &str = "id";
    /// Media type tag column (photo, video, book, document)
    pub const MEDIA_TYPE: &str = "media_type";
    /// Identifier of the reviewed record within its media table
    pub const MEDIA_ID: &str = "media_id";
    /// Rating column (1-10)
    pub const RATING: &str = "rating";
    /// Optional comment column
    pub const COMMENT: &str = "comment";
    /// Creation timestamp column
    pub const CREATED_AT: &str = "created_at";
}

/// Character to photo join relation
pub mod character_photo {
    /// Table name
    pub const TABLE: &str = "character_photo";
    /// Foreign key to characters
    pub const CHARACTER_ID: &str = "character_id";
    /// Foreign key to photos
    pub const MEDIA_ID: &str = "photo_id";
}

/// Character to video join relation
pub mod character_video {
    /// Table name
    pub const TABLE: &str = "character_video";
    /// Foreign key to characters
    pub const CHARACTER_ID: &str = "character_id";
    /// Foreign key to videos
    pub const MEDIA_ID: &str = "video_id";
}

/// Character to book join relation
pub mod character_book {
    /// Table name
    pub const TABLE: &str = "character_book";
    /// Foreign key to characters
    pub const CHARACTER_ID: &str = "character_id";
    /// Foreign key to books
    pub const MEDIA_ID: &str = "book_id";
}
