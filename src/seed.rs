//! Sample data for a fresh catalog.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::catalog::Catalog;
use crate::error::{GalleryError, Result};
use crate::models::{
    MediaRef, MediaType, NewBook, NewCharacter, NewPhoto, NewReview, NewUserDocument, NewVideo,
};

/// Items created per media kind
pub const ITEMS_PER_KIND: u32 = 20;
/// Random reviews created
pub const SAMPLE_REVIEWS: usize = 20;
/// Media items of each kind linked to each of the first two characters
const LINKS_PER_CHARACTER: usize = 5;

const CHARACTER_NAMES: [&str; 6] = [
    "Harry Potter",
    "Hermione Granger",
    "Ron Weasley",
    "Albus Dumbledore",
    "Severus Snape",
    "Lord Voldemort",
];

const MEDIA_TYPES: [MediaType; 4] = [
    MediaType::Photo,
    MediaType::Video,
    MediaType::Book,
    MediaType::Document,
];

/// What a seeding run created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    /// Photos created
    pub photos: usize,
    /// Videos created
    pub videos: usize,
    /// Books created
    pub books: usize,
    /// Documents created
    pub documents: usize,
    /// Characters created
    pub characters: usize,
    /// Character to media links created
    pub links: usize,
    /// Reviews created
    pub reviews: usize,
}

/// Fill the catalog with sample media, characters, links and reviews.
///
/// The first character is linked to the first five photos, videos and
/// books, the second to the next five. Reviews pick a random media item among
/// those just created and a random rating, drawn from `rng`.
pub fn seed_sample_data<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    let mut photo_ids = Vec::new();
    let mut video_ids = Vec::new();
    let mut book_ids = Vec::new();
    let mut document_ids = Vec::new();

    for i in 1..=ITEMS_PER_KIND {
        let n = i64::from(i);

        let photo = catalog.photos.create(NewPhoto {
            title: format!("Test Photo {i}"),
            description: Some(format!("Description for photo {i}")),
            file_path: format!("/uploads/photo_{i}.jpg"),
            file_size: 1024 * n,
            file_type: "image/jpeg".to_string(),
            width: Some(800),
            height: Some(600),
        })?;
        photo_ids.push(photo.id);

        let video = catalog.videos.create(NewVideo {
            title: format!("Test Video {i}"),
            description: Some(format!("Description for video {i}")),
            file_path: format!("/uploads/video_{i}.mp4"),
            file_size: 1024 * 1024 * n,
            file_type: "video/mp4".to_string(),
            width: Some(1920),
            height: Some(1080),
            duration: Some(6.0 * f64::from(i)),
        })?;
        video_ids.push(video.id);

        let book = catalog.books.create(NewBook {
            title: format!("Test Book {i}"),
            author: format!("Author {i}"),
            description: Some(format!("Description for book {i}")),
            file_path: format!("/uploads/book_{i}.pdf"),
            file_size: 1024 * 500 * n,
            file_format: "PDF".to_string(),
            page_count: i32::try_from(100 + i * 10).ok(),
        })?;
        book_ids.push(book.id);

        let document = catalog.documents.create(NewUserDocument {
            title: format!("Test Document {i}"),
            description: Some(format!("Description for document {i}")),
            file_path: format!("/uploads/document_{i}.docx"),
            file_size: 1024 * 50 * n,
            review: Some(format!("Review for document {i}")),
        })?;
        document_ids.push(document.id);
    }

    summary.photos = photo_ids.len();
    summary.videos = video_ids.len();
    summary.books = book_ids.len();
    summary.documents = document_ids.len();

    let mut character_ids = Vec::with_capacity(CHARACTER_NAMES.len());
    for name in CHARACTER_NAMES {
        let character = catalog.characters.create(NewCharacter {
            name: name.to_string(),
            description: Some(format!("Description of {name}")),
        })?;
        character_ids.push(character.id);
    }
    summary.characters = character_ids.len();

    for (slot, character_id) in character_ids.iter().take(2).enumerate() {
        let range = slot * LINKS_PER_CHARACTER..(slot + 1) * LINKS_PER_CHARACTER;
        for index in range {
            catalog.characters.add_photo(*character_id, photo_ids[index])?;
            catalog.characters.add_video(*character_id, video_ids[index])?;
            catalog.characters.add_book(*character_id, book_ids[index])?;
            summary.links += 3;
        }
    }

    for _ in 0..SAMPLE_REVIEWS {
        let media_type = *MEDIA_TYPES
            .choose(rng)
            .ok_or_else(|| GalleryError::validation("no media types to review"))?;
        let ids = match media_type {
            MediaType::Photo => &photo_ids,
            MediaType::Video => &video_ids,
            MediaType::Book => &book_ids,
            MediaType::Document => &document_ids,
        };
        let media_id = *ids
            .choose(rng)
            .ok_or_else(|| GalleryError::validation("no media items to review"))?;

        catalog.create_review(NewReview {
            target: MediaRef::new(media_type, media_id),
            rating: rng.gen_range(1..=10),
            comment: Some(format!("Comment for {media_type} {media_id}")),
        })?;
        summary.reviews += 1;
    }

    info!(?summary, "Sample data seeded");
    Ok(summary)
}
