//! Review queries over the polymorphic media reference.

use rusqlite::params;
use rusqlite::types::Value;

use crate::error::{GalleryError, Result};
use crate::models::{Book, MediaRef, MediaType, NewReview, Photo, Review, UserDocument, Video};
use crate::repository::{exists_in, insert, select_where, Entity, Repository};
use crate::schema::reviews;
use crate::validation::{InputValidator, MAX_PAGE_SIZE};

/// Table holding records of the given media type
#[must_use]
pub const fn media_table(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Photo => Photo::TABLE,
        MediaType::Video => Video::TABLE,
        MediaType::Book => Book::TABLE,
        MediaType::Document => UserDocument::TABLE,
    }
}

impl Repository<Review> {
    /// Reviews of one media item, oldest first, capped at [`MAX_PAGE_SIZE`]
    pub fn get_by_media(&self, target: MediaRef) -> Result<Vec<Review>> {
        let clause = format!("{} = ? AND {} = ?", reviews::MEDIA_TYPE, reviews::MEDIA_ID);
        let args = [
            Value::Text(target.media_type().as_str().to_string()),
            Value::Integer(target.media_id()),
        ];
        self.database().read(Review::KIND.as_str(), "get_by_media", |conn| {
            select_where::<Review>(conn, &clause, &args, MAX_PAGE_SIZE, 0)
        })
    }

    /// Mean rating of one media item; `None` when it has no reviews
    pub fn average_rating(&self, target: MediaRef) -> Result<Option<f64>> {
        self.database().read(Review::KIND.as_str(), "average_rating", |conn| {
            let average: Option<f64> = conn.query_row(
                &format!(
                    "SELECT AVG({}) FROM {} WHERE {} = ? AND {} = ?",
                    reviews::RATING,
                    reviews::TABLE,
                    reviews::MEDIA_TYPE,
                    reviews::MEDIA_ID
                ),
                params![target.media_type(), target.media_id()],
                |row| row.get(0),
            )?;
            Ok(average)
        })
    }

    /// Reviews rated between `min` and `max` inclusive.
    ///
    /// Bounds are not checked against each other: `min > max` matches
    /// nothing and yields an empty result.
    pub fn by_rating_range(&self, min: i32, max: i32, limit: u32) -> Result<Vec<Review>> {
        let limit = InputValidator::validate_limit(limit)?;
        let clause = format!("{} BETWEEN ? AND ?", reviews::RATING);
        let args = [Value::Integer(i64::from(min)), Value::Integer(i64::from(max))];
        self.database().read(Review::KIND.as_str(), "by_rating_range", |conn| {
            select_where::<Review>(conn, &clause, &args, limit, 0)
        })
    }

    /// Create a review only if the media item it targets exists.
    ///
    /// The existence check and the insert share one transaction, so the
    /// target cannot disappear in between.
    pub fn create_for_existing(&self, new: NewReview) -> Result<Review> {
        Review::validate_create(&new)?;
        self.database().write(Review::KIND.as_str(), "create", |conn| {
            let target = new.target;
            if !exists_in(conn, media_table(target.media_type()), target.media_id())? {
                return Err(GalleryError::validation(format!("review target {target} does not exist")));
            }
            insert::<Review>(conn, new)
        })
    }
}
