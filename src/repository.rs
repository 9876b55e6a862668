//! Generic repository engine.
//!
//! One implementation of get/list/create/update/delete serves every entity
//! kind. A kind plugs in by implementing [`Entity`], which tells the engine
//! its table, how to read a row, how to validate input and which join
//! relations reference it. Kind-specific queries live in `search`,
//! `characters` and `reviews` as further `impl` blocks on [`Repository`].

use std::marker::PhantomData;

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::db::Database;
use crate::error::Result;
use crate::models::EntityKind;
use crate::validation::InputValidator;

/// Column name of every table's surrogate key
pub const ID_COLUMN: &str = "id";
/// Column name of the creation timestamp on timestamped tables
pub const CREATED_AT_COLUMN: &str = "created_at";

/// A join relation column that references rows of an entity's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinColumn {
    /// Join table name
    pub table: &'static str,
    /// Column in the join table holding this entity's id
    pub column: &'static str,
}

/// A record type the generic repository can store.
pub trait Entity: Sized {
    /// Creation payload
    type Create;
    /// Partial update payload
    type Patch;

    /// Kind tag, used for logging, metrics and result keys
    const KIND: EntityKind;
    /// Backing table
    const TABLE: &'static str;
    /// Whether the table carries a `created_at` column set on insert
    const TIMESTAMPED: bool = true;
    /// Join relation columns to clear when a record is deleted
    const LINKS: &'static [JoinColumn] = &[];

    /// Store-assigned identifier
    fn id(&self) -> i64;

    /// Map a row selected with `SELECT *` from [`Entity::TABLE`]
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Check a creation payload; runs before anything is written
    fn validate_create(new: &Self::Create) -> Result<()>;

    /// Column values for the insert, excluding `id` and `created_at`
    fn create_values(new: Self::Create) -> Vec<(&'static str, Value)>;

    /// Check a partial update; runs before anything is written
    fn validate_patch(patch: &Self::Patch) -> Result<()>;

    /// Column values to overwrite; absent fields are omitted
    fn patch_values(patch: Self::Patch) -> Vec<(&'static str, Value)>;
}

/// Generic CRUD access to one entity kind.
///
/// Listing and searching return rows in ascending identifier order, which
/// for this store is insertion order. Callers should not rely on any other
/// ordering.
pub struct Repository<E> {
    db: Database,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> std::fmt::Debug for Repository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").field("kind", &E::KIND).finish()
    }
}

impl<E: Entity> Repository<E> {
    /// Create a repository over the given store handle
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Store handle shared with sibling repositories
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// Fetch by identifier; `None` when no record has that id
    pub fn get(&self, id: i64) -> Result<Option<E>> {
        self.db.read(E::KIND.as_str(), "get", |conn| find::<E>(conn, id))
    }

    /// Return one page of records
    pub fn list(&self, offset: u32, limit: u32) -> Result<Vec<E>> {
        let limit = InputValidator::validate_limit(limit)?;
        self.db
            .read(E::KIND.as_str(), "list", |conn| select_where::<E>(conn, "1 = 1", &[], limit, offset))
    }

    /// Validate, insert and return the materialized record
    pub fn create(&self, new: E::Create) -> Result<E> {
        E::validate_create(&new)?;
        self.db.write(E::KIND.as_str(), "create", |conn| insert::<E>(conn, new))
    }

    /// Overwrite only the supplied fields; `None` when no record has that id
    pub fn update(&self, id: i64, patch: E::Patch) -> Result<Option<E>> {
        E::validate_patch(&patch)?;
        self.db.write(E::KIND.as_str(), "update", |conn| {
            if find::<E>(conn, id)?.is_none() {
                return Ok(None);
            }

            let values = E::patch_values(patch);
            if !values.is_empty() {
                let assignments = values
                    .iter()
                    .map(|(column, _)| format!("{column} = ?"))
                    .collect::<Vec<_>>()
                    .join(", ");
                let sql = format!("UPDATE {} SET {} WHERE {} = ?", E::TABLE, assignments, ID_COLUMN);

                let mut params: Vec<Value> = values.into_iter().map(|(_, value)| value).collect();
                params.push(Value::Integer(id));
                conn.execute(&sql, params_from_iter(params.iter()))?;
            }

            find::<E>(conn, id)
        })
    }

    /// Remove a record and every join row referencing it.
    ///
    /// Returns the record as it was before removal, or `None` when nothing
    /// existed at that id.
    pub fn delete(&self, id: i64) -> Result<Option<E>> {
        self.db.write(E::KIND.as_str(), "delete", |conn| {
            let Some(existing) = find::<E>(conn, id)? else {
                return Ok(None);
            };

            for link in E::LINKS {
                conn.execute(
                    &format!("DELETE FROM {} WHERE {} = ?", link.table, link.column),
                    params![id],
                )?;
            }

            conn.execute(
                &format!("DELETE FROM {} WHERE {} = ?", E::TABLE, ID_COLUMN),
                params![id],
            )?;

            Ok(Some(existing))
        })
    }

    /// Total number of records of this kind
    pub fn count(&self) -> Result<u64> {
        self.db.read(E::KIND.as_str(), "count", |conn| {
            let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", E::TABLE), [], |row| {
                row.get(0)
            })?;
            Ok(u64::try_from(count).unwrap_or_default())
        })
    }

    /// Whether a record exists at `id`
    pub fn exists(&self, id: i64) -> Result<bool> {
        self.db.read(E::KIND.as_str(), "exists", |conn| exists_in(conn, E::TABLE, id))
    }
}

/// Fetch one record by id on an open connection
pub(crate) fn find<E: Entity>(conn: &Connection, id: i64) -> Result<Option<E>> {
    let record = conn
        .query_row(
            &format!("SELECT * FROM {} WHERE {} = ?", E::TABLE, ID_COLUMN),
            params![id],
            E::from_row,
        )
        .optional()?;
    Ok(record)
}

/// Select records matching `clause`, ordered by id, with limit and offset
pub(crate) fn select_where<E: Entity>(
    conn: &Connection,
    clause: &str,
    args: &[Value],
    limit: u32,
    offset: u32,
) -> Result<Vec<E>> {
    let sql = format!(
        "SELECT * FROM {} WHERE {} ORDER BY {} ASC LIMIT ? OFFSET ?",
        E::TABLE,
        clause,
        ID_COLUMN
    );

    let mut params: Vec<Value> = args.to_vec();
    params.push(Value::Integer(i64::from(limit)));
    params.push(Value::Integer(i64::from(offset)));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params.iter()), E::from_row)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Insert a validated payload and read the stored record back
pub(crate) fn insert<E: Entity>(conn: &Connection, new: E::Create) -> Result<E> {
    let mut values = E::create_values(new);
    if E::TIMESTAMPED {
        // Same text layout rusqlite uses for `DateTime<Utc>`
        let created_at = Utc::now().format("%F %T%.f%:z").to_string();
        values.push((CREATED_AT_COLUMN, Value::Text(created_at)));
    }

    let columns = values.iter().map(|(column, _)| *column).collect::<Vec<_>>().join(", ");
    let placeholders = vec!["?"; values.len()].join(", ");
    let sql = format!("INSERT INTO {} ({}) VALUES ({})", E::TABLE, columns, placeholders);

    let params: Vec<Value> = values.into_iter().map(|(_, value)| value).collect();
    conn.execute(&sql, params_from_iter(params.iter()))?;

    // Get the last inserted ID
    let id = conn.last_insert_rowid();
    let record = conn.query_row(
        &format!("SELECT * FROM {} WHERE {} = ?", E::TABLE, ID_COLUMN),
        params![id],
        E::from_row,
    )?;
    Ok(record)
}

/// Whether `table` holds a row with this id
pub(crate) fn exists_in(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    let exists: bool = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)", table, ID_COLUMN),
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}
