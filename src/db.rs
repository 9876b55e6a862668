use std::fs;
use std::path::Path;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::metrics::{MetricsCollector, MetricsTimer};

/// Pool of `SQLite` connections shared by every clone of a [`Database`]
pub type DbPool = Pool<SqliteConnectionManager>;
/// One connection checked out of a [`DbPool`]; returned to the pool on drop
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const MEMORY_PATH: &str = ":memory:";

/// Handle to the persistent store.
///
/// Cheap to clone: clones share one connection pool. Each operation acquires
/// one pooled connection for its unit of work and returns it on every exit
/// path when the guard drops.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    metrics: MetricsCollector,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.pool.state();
        f.debug_struct("Database")
            .field("connections", &state.connections)
            .field("idle_connections", &state.idle_connections)
            .finish()
    }
}

impl Database {
    /// Open (or create) the store at `database_url` with default pool settings
    pub fn new(database_url: &str) -> Result<Self> {
        Self::with_config(&DatabaseConfig {
            url: database_url.to_string(),
            ..DatabaseConfig::default()
        })
    }

    /// Open a private in-memory store, mostly useful for tests
    pub fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:")
    }

    /// Open the store described by `config` and apply migrations
    pub fn with_config(config: &DatabaseConfig) -> Result<Self> {
        let path = sqlite_path(&config.url);
        let metrics = MetricsCollector::default();

        let pool = if path == MEMORY_PATH {
            // Every in-memory connection is its own database, so share one.
            let manager = SqliteConnectionManager::memory().with_init(init_connection);
            Pool::builder()
                .max_size(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
                .build(manager)?
        } else {
            // Create parent directory if it doesn't exist
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }

            let manager = SqliteConnectionManager::file(path).with_init(init_connection);
            Pool::builder()
                .max_size(config.max_connections)
                .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
                .build(manager)?
        };

        metrics.update_connection_pool_size(pool.max_size());

        let conn = pool.get()?;
        Self::run_migrations(&conn)?;
        drop(conn);

        info!(path, max_connections = pool.max_size(), "Database ready");
        Ok(Self { pool, metrics })
    }

    /// Run database migrations
    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(include_str!("../migrations/2026-10-01-000000_create_catalog/up.sql"))?;
        debug!("Migrations applied");
        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Metric names used by this handle
    #[must_use]
    pub const fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Run a read-only unit of work on one pooled connection
    pub fn read<T>(
        &self,
        kind: &'static str,
        operation: &'static str,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let timer = MetricsTimer::new(self.metrics, kind, operation);
        let result = self.get_connection().and_then(|conn| f(&conn));
        self.finish(timer, kind, operation, &result);
        result
    }

    /// Run a mutating unit of work inside one transaction.
    ///
    /// The transaction commits only if `f` succeeds; any error rolls it back
    /// when it is dropped, so no partial write is ever visible.
    pub fn write<T>(
        &self,
        kind: &'static str,
        operation: &'static str,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let timer = MetricsTimer::new(self.metrics, kind, operation);
        let result = self.get_connection().and_then(|mut conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        });
        self.finish(timer, kind, operation, &result);
        result
    }

    fn finish<T>(&self, timer: MetricsTimer, kind: &'static str, operation: &'static str, result: &Result<T>) {
        let elapsed = timer.finish(result.is_ok());
        match result {
            Ok(_) => {
                let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
                debug!(kind, operation, duration_ms, "Store operation completed");
            },
            Err(e) if e.is_store_unavailable() => {
                warn!(kind, operation, error = %e, "Store operation failed");
            },
            Err(e) => debug!(kind, operation, error = %e, "Store operation rejected"),
        }
    }
}

fn init_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}

/// Strip the `sqlite:` scheme from a connection string
fn sqlite_path(database_url: &str) -> &str {
    database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_path_prefixes() {
        assert_eq!(sqlite_path("sqlite:data/media.db"), "data/media.db");
        assert_eq!(sqlite_path("sqlite:///tmp/media.db"), "/tmp/media.db");
        assert_eq!(sqlite_path("sqlite::memory:"), ":memory:");
        assert_eq!(sqlite_path("plain.db"), "plain.db");
    }

    #[test]
    fn test_in_memory_database_has_schema() {
        let db = Database::in_memory().unwrap();
        let tables: i64 = db
            .read("schema", "inspect", |conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
                     ('photos', 'videos', 'books', 'user_documents', 'characters', 'reviews', \
                      'character_photo', 'character_video', 'character_book')",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(tables, 9);
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let db = Database::in_memory().unwrap();
        let result: Result<()> = db.write("characters", "create", |conn| {
            conn.execute("INSERT INTO characters (name) VALUES ('Ghost')", [])?;
            Err(crate::error::GalleryError::validation("abort"))
        });
        assert!(result.is_err());

        let count: i64 = db
            .read("characters", "count", |conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM characters", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 0);
    }
}
