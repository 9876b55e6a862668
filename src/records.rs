//! [`Entity`] implementations for the six stored kinds.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::Row;

use crate::error::Result;
use crate::models::{
    Book, BookPatch, Character, CharacterPatch, EntityKind, MediaRef, MediaType, NewBook,
    NewCharacter, NewPhoto, NewReview, NewUserDocument, NewVideo, Photo, PhotoPatch, Review,
    ReviewPatch, UserDocument, UserDocumentPatch, Video, VideoPatch,
};
use crate::repository::{Entity, JoinColumn};
use crate::schema::{
    books, character_book, character_photo, character_video, characters, photos, reviews,
    user_documents, videos,
};
use crate::validation::InputValidator;

impl ToSql for MediaType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for MediaType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let tag = value.as_str()?;
        tag.parse().map_err(|e: crate::error::GalleryError| FromSqlError::Other(e.to_string().into()))
    }
}

fn text(value: String) -> Value {
    Value::Text(value)
}

fn opt_text(value: Option<String>) -> Value {
    value.map_or(Value::Null, Value::Text)
}

fn opt_int(value: Option<i32>) -> Value {
    value.map_or(Value::Null, |v| Value::Integer(i64::from(v)))
}

fn opt_real(value: Option<f64>) -> Value {
    value.map_or(Value::Null, Value::Real)
}

/// Push `column = value` only when the patch field was supplied; for
/// nullable columns `into` maps `Some(None)` to `NULL`
fn set<T>(
    values: &mut Vec<(&'static str, Value)>,
    column: &'static str,
    field: Option<T>,
    into: impl FnOnce(T) -> Value,
) {
    if let Some(v) = field {
        values.push((column, into(v)));
    }
}

fn description(text: Option<String>) -> Option<String> {
    text.map(|t| InputValidator::sanitize_text(&t))
}

fn check_title(field: &str, value: Option<&String>) -> Result<()> {
    value.map_or(Ok(()), |v| InputValidator::validate_title(field, v))
}

fn check_path(value: Option<&String>) -> Result<()> {
    value.map_or(Ok(()), |v| InputValidator::validate_file_path(v))
}

fn check_size(value: Option<i64>) -> Result<()> {
    value.map_or(Ok(()), InputValidator::validate_file_size)
}

impl Entity for Photo {
    type Create = NewPhoto;
    type Patch = PhotoPatch;

    const KIND: EntityKind = EntityKind::Photo;
    const TABLE: &'static str = photos::TABLE;
    const LINKS: &'static [JoinColumn] = &[JoinColumn {
        table: character_photo::TABLE,
        column: character_photo::MEDIA_ID,
    }];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(photos::ID)?,
            title: row.get(photos::TITLE)?,
            description: row.get(photos::DESCRIPTION)?,
            file_path: row.get(photos::FILE_PATH)?,
            file_size: row.get(photos::FILE_SIZE)?,
            file_type: row.get(photos::FILE_TYPE)?,
            width: row.get(photos::WIDTH)?,
            height: row.get(photos::HEIGHT)?,
            created_at: row.get(photos::CREATED_AT)?,
        })
    }

    fn validate_create(new: &NewPhoto) -> Result<()> {
        InputValidator::validate_title("title", &new.title)?;
        InputValidator::validate_file_path(&new.file_path)?;
        InputValidator::validate_file_size(new.file_size)?;
        InputValidator::validate_title("file_type", &new.file_type)?;
        InputValidator::validate_non_negative("width", new.width)?;
        InputValidator::validate_non_negative("height", new.height)
    }

    fn create_values(new: NewPhoto) -> Vec<(&'static str, Value)> {
        vec![
            (photos::TITLE, text(new.title)),
            (photos::DESCRIPTION, opt_text(description(new.description))),
            (photos::FILE_PATH, text(new.file_path)),
            (photos::FILE_SIZE, Value::Integer(new.file_size)),
            (photos::FILE_TYPE, text(new.file_type)),
            (photos::WIDTH, opt_int(new.width)),
            (photos::HEIGHT, opt_int(new.height)),
        ]
    }

    fn validate_patch(patch: &PhotoPatch) -> Result<()> {
        check_title("title", patch.title.as_ref())?;
        check_path(patch.file_path.as_ref())?;
        check_size(patch.file_size)?;
        check_title("file_type", patch.file_type.as_ref())?;
        InputValidator::validate_non_negative("width", patch.width.flatten())?;
        InputValidator::validate_non_negative("height", patch.height.flatten())
    }

    fn patch_values(patch: PhotoPatch) -> Vec<(&'static str, Value)> {
        let mut values = Vec::new();
        set(&mut values, photos::TITLE, patch.title, text);
        set(&mut values, photos::DESCRIPTION, patch.description.map(description), opt_text);
        set(&mut values, photos::FILE_PATH, patch.file_path, text);
        set(&mut values, photos::FILE_SIZE, patch.file_size, Value::Integer);
        set(&mut values, photos::FILE_TYPE, patch.file_type, text);
        set(&mut values, photos::WIDTH, patch.width, opt_int);
        set(&mut values, photos::HEIGHT, patch.height, opt_int);
        values
    }
}

impl Entity for Video {
    type Create = NewVideo;
    type Patch = VideoPatch;

    const KIND: EntityKind = EntityKind::Video;
    const TABLE: &'static str = videos::TABLE;
    const LINKS: &'static [JoinColumn] = &[JoinColumn {
        table: character_video::TABLE,
        column: character_video::MEDIA_ID,
    }];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(videos::ID)?,
            title: row.get(videos::TITLE)?,
            description: row.get(videos::DESCRIPTION)?,
            file_path: row.get(videos::FILE_PATH)?,
            file_size: row.get(videos::FILE_SIZE)?,
            file_type: row.get(videos::FILE_TYPE)?,
            width: row.get(videos::WIDTH)?,
            height: row.get(videos::HEIGHT)?,
            duration: row.get(videos::DURATION)?,
            created_at: row.get(videos::CREATED_AT)?,
        })
    }

    fn validate_create(new: &NewVideo) -> Result<()> {
        InputValidator::validate_title("title", &new.title)?;
        InputValidator::validate_file_path(&new.file_path)?;
        InputValidator::validate_file_size(new.file_size)?;
        InputValidator::validate_title("file_type", &new.file_type)?;
        InputValidator::validate_non_negative("width", new.width)?;
        InputValidator::validate_non_negative("height", new.height)?;
        InputValidator::validate_duration(new.duration)
    }

    fn create_values(new: NewVideo) -> Vec<(&'static str, Value)> {
        vec![
            (videos::TITLE, text(new.title)),
            (videos::DESCRIPTION, opt_text(description(new.description))),
            (videos::FILE_PATH, text(new.file_path)),
            (videos::FILE_SIZE, Value::Integer(new.file_size)),
            (videos::FILE_TYPE, text(new.file_type)),
            (videos::WIDTH, opt_int(new.width)),
            (videos::HEIGHT, opt_int(new.height)),
            (videos::DURATION, opt_real(new.duration)),
        ]
    }

    fn validate_patch(patch: &VideoPatch) -> Result<()> {
        check_title("title", patch.title.as_ref())?;
        check_path(patch.file_path.as_ref())?;
        check_size(patch.file_size)?;
        check_title("file_type", patch.file_type.as_ref())?;
        InputValidator::validate_non_negative("width", patch.width.flatten())?;
        InputValidator::validate_non_negative("height", patch.height.flatten())?;
        InputValidator::validate_duration(patch.duration.flatten())
    }

    fn patch_values(patch: VideoPatch) -> Vec<(&'static str, Value)> {
        let mut values = Vec::new();
        set(&mut values, videos::TITLE, patch.title, text);
        set(&mut values, videos::DESCRIPTION, patch.description.map(description), opt_text);
        set(&mut values, videos::FILE_PATH, patch.file_path, text);
        set(&mut values, videos::FILE_SIZE, patch.file_size, Value::Integer);
        set(&mut values, videos::FILE_TYPE, patch.file_type, text);
        set(&mut values, videos::WIDTH, patch.width, opt_int);
        set(&mut values, videos::HEIGHT, patch.height, opt_int);
        set(&mut values, videos::DURATION, patch.duration, opt_real);
        values
    }
}

impl Entity for Book {
    type Create = NewBook;
    type Patch = BookPatch;

    const KIND: EntityKind = EntityKind::Book;
    const TABLE: &'static str = books::TABLE;
    const LINKS: &'static [JoinColumn] = &[JoinColumn {
        table: character_book::TABLE,
        column: character_book::MEDIA_ID,
    }];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(books::ID)?,
            title: row.get(books::TITLE)?,
            author: row.get(books::AUTHOR)?,
            description: row.get(books::DESCRIPTION)?,
            file_path: row.get(books::FILE_PATH)?,
            file_size: row.get(books::FILE_SIZE)?,
            file_format: row.get(books::FILE_FORMAT)?,
            page_count: row.get(books::PAGE_COUNT)?,
            created_at: row.get(books::CREATED_AT)?,
        })
    }

    fn validate_create(new: &NewBook) -> Result<()> {
        InputValidator::validate_title("title", &new.title)?;
        InputValidator::validate_title("author", &new.author)?;
        InputValidator::validate_file_path(&new.file_path)?;
        InputValidator::validate_file_size(new.file_size)?;
        InputValidator::validate_title("file_format", &new.file_format)?;
        InputValidator::validate_non_negative("page_count", new.page_count)
    }

    fn create_values(new: NewBook) -> Vec<(&'static str, Value)> {
        vec![
            (books::TITLE, text(new.title)),
            (books::AUTHOR, text(new.author)),
            (books::DESCRIPTION, opt_text(description(new.description))),
            (books::FILE_PATH, text(new.file_path)),
            (books::FILE_SIZE, Value::Integer(new.file_size)),
            (books::FILE_FORMAT, text(new.file_format)),
            (books::PAGE_COUNT, opt_int(new.page_count)),
        ]
    }

    fn validate_patch(patch: &BookPatch) -> Result<()> {
        check_title("title", patch.title.as_ref())?;
        check_title("author", patch.author.as_ref())?;
        check_path(patch.file_path.as_ref())?;
        check_size(patch.file_size)?;
        check_title("file_format", patch.file_format.as_ref())?;
        InputValidator::validate_non_negative("page_count", patch.page_count.flatten())
    }

    fn patch_values(patch: BookPatch) -> Vec<(&'static str, Value)> {
        let mut values = Vec::new();
        set(&mut values, books::TITLE, patch.title, text);
        set(&mut values, books::AUTHOR, patch.author, text);
        set(&mut values, books::DESCRIPTION, patch.description.map(description), opt_text);
        set(&mut values, books::FILE_PATH, patch.file_path, text);
        set(&mut values, books::FILE_SIZE, patch.file_size, Value::Integer);
        set(&mut values, books::FILE_FORMAT, patch.file_format, text);
        set(&mut values, books::PAGE_COUNT, patch.page_count, opt_int);
        values
    }
}

impl Entity for UserDocument {
    type Create = NewUserDocument;
    type Patch = UserDocumentPatch;

    const KIND: EntityKind = EntityKind::Document;
    const TABLE: &'static str = user_documents::TABLE;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(user_documents::ID)?,
            title: row.get(user_documents::TITLE)?,
            description: row.get(user_documents::DESCRIPTION)?,
            file_path: row.get(user_documents::FILE_PATH)?,
            file_size: row.get(user_documents::FILE_SIZE)?,
            review: row.get(user_documents::REVIEW)?,
            created_at: row.get(user_documents::CREATED_AT)?,
        })
    }

    fn validate_create(new: &NewUserDocument) -> Result<()> {
        InputValidator::validate_title("title", &new.title)?;
        InputValidator::validate_file_path(&new.file_path)?;
        InputValidator::validate_file_size(new.file_size)
    }

    fn create_values(new: NewUserDocument) -> Vec<(&'static str, Value)> {
        vec![
            (user_documents::TITLE, text(new.title)),
            (user_documents::DESCRIPTION, opt_text(description(new.description))),
            (user_documents::FILE_PATH, text(new.file_path)),
            (user_documents::FILE_SIZE, Value::Integer(new.file_size)),
            (user_documents::REVIEW, opt_text(description(new.review))),
        ]
    }

    fn validate_patch(patch: &UserDocumentPatch) -> Result<()> {
        check_title("title", patch.title.as_ref())?;
        check_path(patch.file_path.as_ref())?;
        check_size(patch.file_size)
    }

    fn patch_values(patch: UserDocumentPatch) -> Vec<(&'static str, Value)> {
        let mut values = Vec::new();
        set(&mut values, user_documents::TITLE, patch.title, text);
        set(&mut values, user_documents::DESCRIPTION, patch.description.map(description), opt_text);
        set(&mut values, user_documents::FILE_PATH, patch.file_path, text);
        set(&mut values, user_documents::FILE_SIZE, patch.file_size, Value::Integer);
        set(&mut values, user_documents::REVIEW, patch.review.map(description), opt_text);
        values
    }
}

impl Entity for Character {
    type Create = NewCharacter;
    type Patch = CharacterPatch;

    const KIND: EntityKind = EntityKind::Character;
    const TABLE: &'static str = characters::TABLE;
    const TIMESTAMPED: bool = false;
    const LINKS: &'static [JoinColumn] = &[
        JoinColumn {
            table: character_photo::TABLE,
            column: character_photo::CHARACTER_ID,
        },
        JoinColumn {
            table: character_video::TABLE,
            column: character_video::CHARACTER_ID,
        },
        JoinColumn {
            table: character_book::TABLE,
            column: character_book::CHARACTER_ID,
        },
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(characters::ID)?,
            name: row.get(characters::NAME)?,
            description: row.get(characters::DESCRIPTION)?,
        })
    }

    fn validate_create(new: &NewCharacter) -> Result<()> {
        InputValidator::validate_title("name", &new.name)
    }

    fn create_values(new: NewCharacter) -> Vec<(&'static str, Value)> {
        vec![
            (characters::NAME, text(new.name)),
            (characters::DESCRIPTION, opt_text(description(new.description))),
        ]
    }

    fn validate_patch(patch: &CharacterPatch) -> Result<()> {
        check_title("name", patch.name.as_ref())
    }

    fn patch_values(patch: CharacterPatch) -> Vec<(&'static str, Value)> {
        let mut values = Vec::new();
        set(&mut values, characters::NAME, patch.name, text);
        set(&mut values, characters::DESCRIPTION, patch.description.map(description), opt_text);
        values
    }
}

impl Entity for Review {
    type Create = NewReview;
    type Patch = ReviewPatch;

    const KIND: EntityKind = EntityKind::Review;
    const TABLE: &'static str = reviews::TABLE;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let media_type: MediaType = row.get(reviews::MEDIA_TYPE)?;
        Ok(Self {
            id: row.get(reviews::ID)?,
            target: MediaRef::new(media_type, row.get(reviews::MEDIA_ID)?),
            rating: row.get(reviews::RATING)?,
            comment: row.get(reviews::COMMENT)?,
            created_at: row.get(reviews::CREATED_AT)?,
        })
    }

    fn validate_create(new: &NewReview) -> Result<()> {
        InputValidator::validate_rating(new.rating)?;
        InputValidator::validate_id("media_id", new.target.media_id())
    }

    fn create_values(new: NewReview) -> Vec<(&'static str, Value)> {
        vec![
            (reviews::MEDIA_TYPE, text(new.target.media_type().as_str().to_string())),
            (reviews::MEDIA_ID, Value::Integer(new.target.media_id())),
            (reviews::RATING, Value::Integer(i64::from(new.rating))),
            (reviews::COMMENT, opt_text(description(new.comment))),
        ]
    }

    fn validate_patch(patch: &ReviewPatch) -> Result<()> {
        patch.rating.map_or(Ok(()), InputValidator::validate_rating)
    }

    fn patch_values(patch: ReviewPatch) -> Vec<(&'static str, Value)> {
        let mut values = Vec::new();
        set(&mut values, reviews::RATING, patch.rating, |v| Value::Integer(i64::from(v)));
        set(&mut values, reviews::COMMENT, patch.comment.map(description), opt_text);
        values
    }
}
