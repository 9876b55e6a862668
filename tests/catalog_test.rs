//! Catalog-level tests: global search, statistics and sample data

use media_gallery::db::Database;
use media_gallery::models::{NewCharacter, NewPhoto, NewUserDocument};
use media_gallery::seed::{seed_sample_data, SAMPLE_REVIEWS};
use media_gallery::{Catalog, CatalogStats, EntityKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

fn photo(title: &str) -> NewPhoto {
    NewPhoto {
        title: title.to_string(),
        description: None,
        file_path: "/uploads/photo.jpg".to_string(),
        file_size: 1024,
        file_type: "image/jpeg".to_string(),
        width: Some(640),
        height: Some(480),
    }
}

#[test]
fn test_search_all_harry() {
    let catalog = Catalog::new(Database::in_memory().unwrap());
    catalog
        .characters
        .create(NewCharacter {
            name: "Harry Potter".to_string(),
            description: None,
        })
        .unwrap();
    catalog.photos.create(photo("Harry's Photo")).unwrap();
    catalog.photos.create(photo("Unrelated")).unwrap();

    let results = catalog.search_all("Harry", 20).unwrap();

    let json = serde_json::to_value(&results).unwrap();
    for key in ["photos", "videos", "books", "documents", "characters"] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }

    assert_eq!(results.characters.len(), 1);
    assert_eq!(results.characters[0].name, "Harry Potter");
    assert_eq!(results.photos.len(), 1);
    assert_eq!(results.photos[0].title, "Harry's Photo");
    assert!(results.videos.is_empty());
    assert_eq!(results.total(), 2);
}

#[test]
fn test_search_is_case_insensitive_and_limited() {
    let catalog = Catalog::new(Database::in_memory().unwrap());
    for i in 0..5 {
        catalog.photos.create(photo(&format!("Beach day {i}"))).unwrap();
    }

    let hits = catalog.photos.search("BEACH", 3).unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].title, "Beach day 0");

    assert!(catalog.photos.search("beach", 0).unwrap_err().is_validation());
}

#[test]
fn test_search_treats_wildcards_literally() {
    let catalog = Catalog::new(Database::in_memory().unwrap());
    catalog
        .documents
        .create(NewUserDocument {
            title: "Budget 100% final".to_string(),
            description: None,
            file_path: "/uploads/budget.xlsx".to_string(),
            file_size: 10,
            review: None,
        })
        .unwrap();
    catalog
        .documents
        .create(NewUserDocument {
            title: "Budget 1000 draft".to_string(),
            description: None,
            file_path: "/uploads/draft.xlsx".to_string(),
            file_size: 10,
            review: None,
        })
        .unwrap();

    let hits = catalog.documents.search("100%", 20).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Budget 100% final");
}

#[test]
fn test_statistics_track_counts() {
    let catalog = Catalog::new(Database::in_memory().unwrap());
    assert_eq!(catalog.statistics().unwrap(), CatalogStats::default());

    let kept = catalog.photos.create(photo("one")).unwrap();
    let removed = catalog.photos.create(photo("two")).unwrap();
    catalog.photos.delete(removed.id).unwrap();

    let stats = catalog.statistics().unwrap();
    assert_eq!(stats.get(EntityKind::Photo), 1);
    assert_eq!(stats.reviews, 0);
    assert!(catalog.photos.exists(kept.id).unwrap());
}

#[test]
fn test_seed_sample_data() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_url = format!("sqlite://{}", temp_dir.path().join("seeded.db").display());
    let catalog = Catalog::new(Database::new(&db_url).expect("Failed to create database"));

    let mut rng = StdRng::seed_from_u64(7);
    let summary = seed_sample_data(&catalog, &mut rng).expect("Failed to seed");
    assert_eq!(summary.links, 30);

    let stats = catalog.statistics().unwrap();
    assert_eq!(stats.photos, 20);
    assert_eq!(stats.videos, 20);
    assert_eq!(stats.books, 20);
    assert_eq!(stats.documents, 20);
    assert_eq!(stats.characters, 6);
    assert_eq!(stats.reviews, SAMPLE_REVIEWS as u64);

    let harry = catalog.characters.search("Harry", 20).unwrap();
    assert_eq!(harry.len(), 1);
    let linked = catalog.characters.with_media(harry[0].id).unwrap().unwrap();
    assert_eq!(linked.photos.len(), 5);
    assert_eq!(linked.videos.len(), 5);
    assert_eq!(linked.books.len(), 5);
    assert_eq!(linked.books[0].title, "Test Book 1");

    let hermione = catalog.characters.search("Hermione", 20).unwrap();
    let linked = catalog.characters.with_media(hermione[0].id).unwrap().unwrap();
    assert_eq!(linked.photos[0].title, "Test Photo 6");

    let authors = catalog.books.search_by_author("Author 2", 20).unwrap();
    let titles: Vec<_> = authors.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Test Book 2", "Test Book 20"]);

    for review in catalog.reviews.list(0, 100).unwrap() {
        assert!((1..=10).contains(&review.rating));
    }
}
