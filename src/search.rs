//! Case-insensitive substring search.
//!
//! Matching uses SQLite `LIKE`, which folds ASCII letters only. Wildcards in
//! the needle are escaped, so `"50%"` matches the literal text.

use rusqlite::types::Value;

use crate::error::Result;
use crate::models::{Book, Character, Photo, UserDocument, Video};
use crate::repository::{select_where, Entity, Repository};
use crate::schema::{books, characters, photos, user_documents, videos};
use crate::validation::InputValidator;

/// An entity with a text column searchable by substring
pub trait Searchable: Entity {
    /// Column matched by [`Repository::search`]
    const SEARCH_COLUMN: &'static str;
}

impl Searchable for Photo {
    const SEARCH_COLUMN: &'static str = photos::TITLE;
}

impl Searchable for Video {
    const SEARCH_COLUMN: &'static str = videos::TITLE;
}

impl Searchable for Book {
    const SEARCH_COLUMN: &'static str = books::TITLE;
}

impl Searchable for UserDocument {
    const SEARCH_COLUMN: &'static str = user_documents::TITLE;
}

impl Searchable for Character {
    const SEARCH_COLUMN: &'static str = characters::NAME;
}

impl<E: Searchable> Repository<E> {
    /// Records whose title (or name) contains `needle`, at most `limit` of them
    pub fn search(&self, needle: &str, limit: u32) -> Result<Vec<E>> {
        search_column(self, "search", E::SEARCH_COLUMN, needle, limit)
    }
}

impl Repository<Book> {
    /// Books whose author contains `needle`
    pub fn search_by_author(&self, needle: &str, limit: u32) -> Result<Vec<Book>> {
        search_column(self, "search_by_author", books::AUTHOR, needle, limit)
    }
}

fn search_column<E: Entity>(
    repo: &Repository<E>,
    operation: &'static str,
    column: &str,
    needle: &str,
    limit: u32,
) -> Result<Vec<E>> {
    let limit = InputValidator::validate_limit(limit)?;
    let clause = format!("{column} LIKE ? ESCAPE '\\'");
    let pattern = Value::Text(like_pattern(needle));

    let results = repo.database().read(E::KIND.as_str(), operation, |conn| {
        select_where::<E>(conn, &clause, &[pattern], limit, 0)
    })?;

    repo.database().metrics().record_search_results(E::KIND.as_str(), results.len());
    Ok(results)
}

/// Wrap `needle` in `%` after escaping `LIKE` wildcards and the escape char
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
