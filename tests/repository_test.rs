//! Integration tests for the generic repository over every entity kind

use media_gallery::db::Database;
use media_gallery::models::{
    BookPatch, MediaRef, NewBook, NewCharacter, NewPhoto, NewReview, NewUserDocument, NewVideo,
    PhotoPatch, ReviewPatch, UserDocumentPatch,
};
use media_gallery::{Book, Character, Photo, Repository, Review, UserDocument, Video};
use tempfile::TempDir;

fn new_photo(title: &str) -> NewPhoto {
    NewPhoto {
        title: title.to_string(),
        description: Some("Sunset over the lake".to_string()),
        file_path: "/uploads/photo.jpg".to_string(),
        file_size: 2048,
        file_type: "image/jpeg".to_string(),
        width: Some(800),
        height: Some(600),
    }
}

fn new_book(title: &str, author: &str) -> NewBook {
    NewBook {
        title: title.to_string(),
        author: author.to_string(),
        description: None,
        file_path: "/uploads/book.pdf".to_string(),
        file_size: 512_000,
        file_format: "PDF".to_string(),
        page_count: Some(320),
    }
}

#[test]
fn test_create_then_get_returns_equal_record() {
    let db = Database::in_memory().expect("Failed to open database");
    let photos: Repository<Photo> = Repository::new(db);

    let created = photos.create(new_photo("Lake")).expect("Failed to create photo");
    assert!(created.id > 0);
    assert_eq!(created.title, "Lake");
    assert_eq!(created.width, Some(800));

    let fetched = photos.get(created.id).expect("Failed to get photo");
    assert_eq!(fetched, Some(created));
}

#[test]
fn test_create_every_kind() {
    let db = Database::in_memory().expect("Failed to open database");

    let video = Repository::<Video>::new(db.clone())
        .create(NewVideo {
            title: "Trailer".to_string(),
            description: None,
            file_path: "/uploads/trailer.mp4".to_string(),
            file_size: 1_048_576,
            file_type: "video/mp4".to_string(),
            width: Some(1920),
            height: Some(1080),
            duration: Some(90.5),
        })
        .expect("Failed to create video");
    assert_eq!(video.duration, Some(90.5));

    let document = Repository::<UserDocument>::new(db.clone())
        .create(NewUserDocument {
            title: "Notes".to_string(),
            description: None,
            file_path: "/uploads/notes.docx".to_string(),
            file_size: 100,
            review: Some("Worth keeping".to_string()),
        })
        .expect("Failed to create document");
    assert_eq!(document.review.as_deref(), Some("Worth keeping"));

    let character = Repository::<Character>::new(db.clone())
        .create(NewCharacter {
            name: "Luna Lovegood".to_string(),
            description: None,
        })
        .expect("Failed to create character");
    assert_eq!(character.name, "Luna Lovegood");

    let reviews = Repository::<Review>::new(db);
    let review = reviews
        .create(NewReview {
            target: MediaRef::Video(video.id),
            rating: 9,
            comment: Some("Great".to_string()),
        })
        .expect("Failed to create review");
    assert_eq!(reviews.get(review.id).expect("Failed to get review"), Some(review));
}

#[test]
fn test_get_absent_is_none() {
    let db = Database::in_memory().expect("Failed to open database");
    let books: Repository<Book> = Repository::new(db);
    assert_eq!(books.get(42).expect("Failed to query book"), None);
}

#[test]
fn test_update_absent_returns_none_and_creates_nothing() {
    let db = Database::in_memory().expect("Failed to open database");
    let photos: Repository<Photo> = Repository::new(db);

    let patch = PhotoPatch {
        title: Some("Ghost".to_string()),
        ..PhotoPatch::default()
    };
    assert_eq!(photos.update(99, patch).expect("Failed to run update"), None);
    assert_eq!(photos.count().expect("Failed to count photos"), 0);
}

#[test]
fn test_partial_update_changes_only_given_field() {
    let db = Database::in_memory().expect("Failed to open database");
    let books: Repository<Book> = Repository::new(db);

    let original = books
        .create(new_book("The Hobbit", "J. R. R. Tolkien"))
        .expect("Failed to create book");

    let patch = BookPatch {
        page_count: Some(Some(310)),
        ..BookPatch::default()
    };
    let updated = books
        .update(original.id, patch)
        .expect("Failed to update book")
        .expect("Book should exist");

    assert_eq!(updated.page_count, Some(310));
    assert_eq!(updated.title, original.title);
    assert_eq!(updated.author, original.author);
    assert_eq!(updated.file_path, original.file_path);
    assert_eq!(updated.created_at, original.created_at);
}

#[test]
fn test_empty_patch_is_noop() {
    let db = Database::in_memory().expect("Failed to open database");
    let documents: Repository<UserDocument> = Repository::new(db);

    let original = documents
        .create(NewUserDocument {
            title: "Draft".to_string(),
            description: None,
            file_path: "/uploads/draft.docx".to_string(),
            file_size: 10,
            review: None,
        })
        .expect("Failed to create document");

    let updated = documents
        .update(original.id, UserDocumentPatch::default())
        .expect("Failed to update document");
    assert_eq!(updated, Some(original));
}

#[test]
fn test_invalid_update_is_rejected_before_write() {
    let db = Database::in_memory().expect("Failed to open database");
    let photos: Repository<Photo> = Repository::new(db);
    let photo = photos.create(new_photo("Keep")).expect("Failed to create photo");

    let patch = PhotoPatch {
        title: Some("   ".to_string()),
        ..PhotoPatch::default()
    };
    let err = photos.update(photo.id, patch).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(photos.get(photo.id).unwrap().unwrap().title, "Keep");
}

#[test]
fn test_review_update_revalidates_rating() {
    let db = Database::in_memory().expect("Failed to open database");
    let reviews: Repository<Review> = Repository::new(db);
    let review = reviews
        .create(NewReview {
            target: MediaRef::Book(1),
            rating: 5,
            comment: None,
        })
        .expect("Failed to create review");

    let bad = ReviewPatch {
        rating: Some(0),
        comment: None,
    };
    assert!(reviews.update(review.id, bad).unwrap_err().is_validation());

    let good = ReviewPatch {
        rating: Some(10),
        comment: Some(Some("Changed my mind".to_string())),
    };
    let updated = reviews.update(review.id, good).unwrap().unwrap();
    assert_eq!(updated.rating, 10);
    assert_eq!(updated.target, MediaRef::Book(1));
}

#[test]
fn test_null_in_patch_clears_nullable_fields() {
    let db = Database::in_memory().expect("Failed to open database");
    let photos: Repository<Photo> = Repository::new(db);
    let photo = photos
        .create(NewPhoto {
            description: Some("old".to_string()),
            width: Some(5),
            ..new_photo("Faded")
        })
        .expect("Failed to create photo");

    let patch: PhotoPatch =
        serde_json::from_str(r#"{"description": null, "width": null}"#).expect("Failed to parse patch");
    assert_eq!(patch.description, Some(None));
    assert_eq!(patch.width, Some(None));
    assert_eq!(patch.height, None);

    let updated = photos
        .update(photo.id, patch)
        .expect("Failed to update photo")
        .expect("Photo should exist");
    assert_eq!(updated.description, None);
    assert_eq!(updated.width, None);
    assert_eq!(updated.height, Some(600));
    assert_eq!(updated.title, "Faded");
    assert_eq!(photos.get(photo.id).unwrap(), Some(updated));
}

#[test]
fn test_absent_patch_keys_keep_nullable_fields() {
    let db = Database::in_memory().expect("Failed to open database");
    let books: Repository<Book> = Repository::new(db);
    let book = books
        .create(NewBook {
            description: Some("First edition".to_string()),
            ..new_book("Dune", "Frank Herbert")
        })
        .expect("Failed to create book");

    let patch: BookPatch = serde_json::from_str(r#"{"title": "Dune Messiah"}"#).expect("Failed to parse patch");
    let updated = books.update(book.id, patch).unwrap().unwrap();
    assert_eq!(updated.title, "Dune Messiah");
    assert_eq!(updated.description, Some("First edition".to_string()));
    assert_eq!(updated.page_count, Some(320));
}

#[test]
fn test_review_comment_can_be_cleared() {
    let db = Database::in_memory().expect("Failed to open database");
    let reviews: Repository<Review> = Repository::new(db);
    let review = reviews
        .create(NewReview {
            target: MediaRef::Photo(1),
            rating: 7,
            comment: Some("Too dark".to_string()),
        })
        .expect("Failed to create review");

    let patch = ReviewPatch {
        rating: None,
        comment: Some(None),
    };
    let updated = reviews.update(review.id, patch).unwrap().unwrap();
    assert_eq!(updated.comment, None);
    assert_eq!(updated.rating, 7);
}

#[test]
fn test_delete_returns_snapshot_then_absent() {
    let db = Database::in_memory().expect("Failed to open database");
    let photos: Repository<Photo> = Repository::new(db);
    let photo = photos.create(new_photo("Gone soon")).expect("Failed to create photo");

    let deleted = photos.delete(photo.id).expect("Failed to delete photo");
    assert_eq!(deleted, Some(photo.clone()));
    assert_eq!(photos.get(photo.id).unwrap(), None);
    assert_eq!(photos.delete(photo.id).unwrap(), None);
}

#[test]
fn test_delete_removes_join_rows() {
    let db = Database::in_memory().expect("Failed to open database");
    let photos: Repository<Photo> = Repository::new(db.clone());
    let characters: Repository<Character> = Repository::new(db);

    let photo = photos.create(new_photo("Group shot")).unwrap();
    let character = characters
        .create(NewCharacter {
            name: "Neville Longbottom".to_string(),
            description: None,
        })
        .unwrap();
    characters.add_photo(character.id, photo.id).unwrap();

    photos.delete(photo.id).unwrap();
    assert!(characters.photos(character.id).unwrap().is_empty());

    let other = photos.create(new_photo("Portrait")).unwrap();
    characters.add_photo(character.id, other.id).unwrap();
    characters.delete(character.id).unwrap();
    assert!(photos.characters(other.id).unwrap().is_empty());
}

#[test]
fn test_list_pages_in_insertion_order() {
    let db = Database::in_memory().expect("Failed to open database");
    let books: Repository<Book> = Repository::new(db);

    for i in 1..=5 {
        books.create(new_book(&format!("Volume {i}"), "Anon")).unwrap();
    }

    let first = books.list(0, 2).unwrap();
    let titles: Vec<_> = first.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Volume 1", "Volume 2"]);

    let rest = books.list(2, 10).unwrap();
    assert_eq!(rest.len(), 3);
    assert_eq!(rest[0].title, "Volume 3");

    assert!(books.list(10, 10).unwrap().is_empty());
}

#[test]
fn test_list_zero_limit_is_validation_error() {
    let db = Database::in_memory().expect("Failed to open database");
    let books: Repository<Book> = Repository::new(db);
    assert!(books.list(0, 0).unwrap_err().is_validation());
}

#[test]
fn test_create_missing_required_field_fails() {
    let db = Database::in_memory().expect("Failed to open database");
    let books: Repository<Book> = Repository::new(db);

    let err = books.create(new_book("Untitled", "")).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(books.count().unwrap(), 0);
}

#[test]
fn test_identifiers_are_not_reused() {
    let db = Database::in_memory().expect("Failed to open database");
    let photos: Repository<Photo> = Repository::new(db);

    let first = photos.create(new_photo("One")).unwrap();
    photos.delete(first.id).unwrap();
    let second = photos.create(new_photo("Two")).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn test_on_disk_database_persists_across_handles() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_url = format!("sqlite://{}", temp_dir.path().join("gallery.db").display());

    let id = {
        let db = Database::new(&db_url).expect("Failed to create database");
        Repository::<Photo>::new(db).create(new_photo("Durable")).unwrap().id
    };

    let db = Database::new(&db_url).expect("Failed to reopen database");
    let photo = Repository::<Photo>::new(db).get(id).unwrap();
    assert_eq!(photo.map(|p| p.title), Some("Durable".to_string()));
}

fn on_disk_database(temp_dir: &TempDir) -> Database {
    let db_url = format!("sqlite://{}", temp_dir.path().join("gallery.db").display());
    Database::new(&db_url).expect("Failed to create database")
}

#[test]
fn test_read_from_missing_table_is_store_unavailable() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db = on_disk_database(&temp_dir);
    let photos: Repository<Photo> = Repository::new(db.clone());
    let photo = photos.create(new_photo("Lost")).expect("Failed to create photo");

    db.get_connection()
        .expect("Failed to get connection")
        .execute_batch("DROP TABLE character_photo; DROP TABLE photos;")
        .expect("Failed to drop tables");

    let err = photos.get(photo.id).unwrap_err();
    assert!(err.is_store_unavailable());
    assert!(!err.is_validation());

    assert!(photos.list(0, 10).unwrap_err().is_store_unavailable());
    assert!(photos.create(new_photo("Retry")).unwrap_err().is_store_unavailable());
}

#[test]
fn test_failed_delete_leaves_store_unchanged() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db = on_disk_database(&temp_dir);
    let photos: Repository<Photo> = Repository::new(db.clone());
    let characters: Repository<Character> = Repository::new(db.clone());

    let photo = photos.create(new_photo("Team")).unwrap();
    let character = characters
        .create(NewCharacter {
            name: "Luna Lovegood".to_string(),
            description: None,
        })
        .unwrap();
    characters.add_photo(character.id, photo.id).unwrap();

    // The photo links are cleared before the missing book relation is reached
    db.get_connection()
        .expect("Failed to get connection")
        .execute_batch("DROP TABLE character_book;")
        .expect("Failed to drop table");

    let err = characters.delete(character.id).unwrap_err();
    assert!(err.is_store_unavailable());

    assert_eq!(characters.get(character.id).unwrap(), Some(character.clone()));
    let linked = characters.photos(character.id).unwrap();
    assert_eq!(linked.iter().map(|p| p.id).collect::<Vec<_>>(), vec![photo.id]);
}
