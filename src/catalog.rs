//! Catalog façade over all six repositories.

use tracing::{debug, info};

use crate::config::CatalogConfig;
use crate::db::Database;
use crate::error::Result;
use crate::logging::OperationTimer;
use crate::models::{
    Book, CatalogStats, Character, NewReview, Photo, Review, SearchResults, UserDocument, Video,
};
use crate::repository::Repository;

/// Every repository over one shared store handle
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Photo records
    pub photos: Repository<Photo>,
    /// Video records
    pub videos: Repository<Video>,
    /// Book records
    pub books: Repository<Book>,
    /// User documents
    pub documents: Repository<UserDocument>,
    /// Characters and their media links
    pub characters: Repository<Character>,
    /// Reviews of any media kind
    pub reviews: Repository<Review>,
    config: CatalogConfig,
}

impl Catalog {
    /// Build a catalog with default settings
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self::with_config(db, CatalogConfig::default())
    }

    /// Build a catalog over `db`
    #[must_use]
    pub fn with_config(db: Database, config: CatalogConfig) -> Self {
        Self {
            photos: Repository::new(db.clone()),
            videos: Repository::new(db.clone()),
            books: Repository::new(db.clone()),
            documents: Repository::new(db.clone()),
            characters: Repository::new(db.clone()),
            reviews: Repository::new(db),
            config,
        }
    }

    /// Active settings
    #[must_use]
    pub const fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Run the title/name search on every searchable kind.
    ///
    /// Each kind is queried independently with the same per-kind `limit`;
    /// there is no ranking or merging across kinds.
    pub fn search_all(&self, query: &str, limit: u32) -> Result<SearchResults> {
        let timer = OperationTimer::new("search_all");

        let results = SearchResults {
            photos: self.photos.search(query, limit)?,
            videos: self.videos.search(query, limit)?,
            books: self.books.search(query, limit)?,
            documents: self.documents.search(query, limit)?,
            characters: self.characters.search(query, limit)?,
        };

        debug!(query, limit, hits = results.total(), "Global search finished");
        timer.finish();
        Ok(results)
    }

    /// Current row count of every kind
    pub fn statistics(&self) -> Result<CatalogStats> {
        Ok(CatalogStats {
            photos: self.photos.count()?,
            videos: self.videos.count()?,
            books: self.books.count()?,
            documents: self.documents.count()?,
            characters: self.characters.count()?,
            reviews: self.reviews.count()?,
        })
    }

    /// Create a review, checking its target when `strict_review_targets` is set
    pub fn create_review(&self, new: NewReview) -> Result<Review> {
        let review = if self.config.strict_review_targets {
            self.reviews.create_for_existing(new)?
        } else {
            self.reviews.create(new)?
        };
        info!(review_id = review.id, target = %review.target, rating = review.rating, "Review created");
        Ok(review)
    }
}
