//! Character and media many-to-many links.
//!
//! Each association is its own join table with a composite primary key, so a
//! link is either present or absent. Both directions are explicit queries:
//! character to media via [`Repository::media`] and media to characters via
//! [`Repository::characters`].

use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::Result;
use crate::models::{Book, Character, CharacterWithMedia, Photo, Video};
use crate::repository::{find, Entity, Repository, ID_COLUMN};
use crate::schema::{character_book, character_photo, character_video};
use crate::validation::MAX_PAGE_SIZE;

/// One character to media join table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinRelation {
    /// Join table name
    pub table: &'static str,
    /// Column referencing `characters.id`
    pub character_column: &'static str,
    /// Column referencing the media table's id
    pub media_column: &'static str,
}

/// A media kind that characters can be linked to
pub trait CharacterMedia: Entity {
    /// Join table recording the links
    const RELATION: JoinRelation;
}

impl CharacterMedia for Photo {
    const RELATION: JoinRelation = JoinRelation {
        table: character_photo::TABLE,
        character_column: character_photo::CHARACTER_ID,
        media_column: character_photo::MEDIA_ID,
    };
}

impl CharacterMedia for Video {
    const RELATION: JoinRelation = JoinRelation {
        table: character_video::TABLE,
        character_column: character_video::CHARACTER_ID,
        media_column: character_video::MEDIA_ID,
    };
}

impl CharacterMedia for Book {
    const RELATION: JoinRelation = JoinRelation {
        table: character_book::TABLE,
        character_column: character_book::CHARACTER_ID,
        media_column: character_book::MEDIA_ID,
    };
}

impl Repository<Character> {
    /// Media of kind `M` linked to a character.
    ///
    /// Empty both when the character has no links and when it does not
    /// exist; use [`Repository::exists`] to tell the two apart.
    pub fn media<M: CharacterMedia>(&self, character_id: i64) -> Result<Vec<M>> {
        self.database()
            .read(M::KIND.as_str(), "linked_media", |conn| linked_media::<M>(conn, character_id))
    }

    /// Photos linked to a character
    pub fn photos(&self, character_id: i64) -> Result<Vec<Photo>> {
        self.media(character_id)
    }

    /// Videos linked to a character
    pub fn videos(&self, character_id: i64) -> Result<Vec<Video>> {
        self.media(character_id)
    }

    /// Books linked to a character
    pub fn books(&self, character_id: i64) -> Result<Vec<Book>> {
        self.media(character_id)
    }

    /// The character with all linked media; `None` if it does not exist
    pub fn with_media(&self, character_id: i64) -> Result<Option<CharacterWithMedia>> {
        self.database()
            .read(Character::KIND.as_str(), "with_media", |conn| load_with_media(conn, character_id))
    }

    /// Link a media item to a character.
    ///
    /// Returns `None` without writing anything when either side is missing.
    /// Linking an already linked pair changes nothing.
    pub fn attach<M: CharacterMedia>(
        &self,
        character_id: i64,
        media_id: i64,
    ) -> Result<Option<CharacterWithMedia>> {
        self.database().write(M::KIND.as_str(), "attach", |conn| {
            if find::<Character>(conn, character_id)?.is_none() || find::<M>(conn, media_id)?.is_none() {
                debug!(character_id, media_id, kind = %M::KIND, "Link target missing");
                return Ok(None);
            }

            let relation = M::RELATION;
            let inserted = conn.execute(
                &format!(
                    "INSERT OR IGNORE INTO {} ({}, {}) VALUES (?, ?)",
                    relation.table, relation.character_column, relation.media_column
                ),
                params![character_id, media_id],
            )?;
            if inserted == 0 {
                debug!(character_id, media_id, kind = %M::KIND, "Link already present");
            }

            load_with_media(conn, character_id)
        })
    }

    /// Link a photo to a character
    pub fn add_photo(&self, character_id: i64, photo_id: i64) -> Result<Option<CharacterWithMedia>> {
        self.attach::<Photo>(character_id, photo_id)
    }

    /// Link a video to a character
    pub fn add_video(&self, character_id: i64, video_id: i64) -> Result<Option<CharacterWithMedia>> {
        self.attach::<Video>(character_id, video_id)
    }

    /// Link a book to a character
    pub fn add_book(&self, character_id: i64, book_id: i64) -> Result<Option<CharacterWithMedia>> {
        self.attach::<Book>(character_id, book_id)
    }

    /// Remove a link; returns whether one existed
    pub fn detach<M: CharacterMedia>(&self, character_id: i64, media_id: i64) -> Result<bool> {
        self.database().write(M::KIND.as_str(), "detach", |conn| {
            let relation = M::RELATION;
            let removed = conn.execute(
                &format!(
                    "DELETE FROM {} WHERE {} = ? AND {} = ?",
                    relation.table, relation.character_column, relation.media_column
                ),
                params![character_id, media_id],
            )?;
            Ok(removed > 0)
        })
    }
}

impl<M: CharacterMedia> Repository<M> {
    /// Characters linked to a media item, in identifier order
    pub fn characters(&self, media_id: i64) -> Result<Vec<Character>> {
        self.database().read(Character::KIND.as_str(), "linked_characters", |conn| {
            let relation = M::RELATION;
            let sql = format!(
                "SELECT c.* FROM {table} c JOIN {join} j ON j.{char_col} = c.{id} \
                 WHERE j.{media_col} = ? ORDER BY c.{id} ASC LIMIT ?",
                table = Character::TABLE,
                join = relation.table,
                char_col = relation.character_column,
                media_col = relation.media_column,
                id = ID_COLUMN,
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![media_id, MAX_PAGE_SIZE], Character::from_row)?;

            let mut characters = Vec::new();
            for row in rows {
                characters.push(row?);
            }
            Ok(characters)
        })
    }
}

fn linked_media<M: CharacterMedia>(conn: &Connection, character_id: i64) -> Result<Vec<M>> {
    let relation = M::RELATION;
    let sql = format!(
        "SELECT m.* FROM {table} m JOIN {join} j ON j.{media_col} = m.{id} \
         WHERE j.{char_col} = ? ORDER BY m.{id} ASC LIMIT ?",
        table = M::TABLE,
        join = relation.table,
        media_col = relation.media_column,
        char_col = relation.character_column,
        id = ID_COLUMN,
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![character_id, MAX_PAGE_SIZE], M::from_row)?;

    let mut media = Vec::new();
    for row in rows {
        media.push(row?);
    }
    Ok(media)
}

fn load_with_media(conn: &Connection, character_id: i64) -> Result<Option<CharacterWithMedia>> {
    let Some(character) = find::<Character>(conn, character_id)? else {
        return Ok(None);
    };

    Ok(Some(CharacterWithMedia {
        character,
        photos: linked_media(conn, character_id)?,
        videos: linked_media(conn, character_id)?,
        books: linked_media(conn, character_id)?,
    }))
}
