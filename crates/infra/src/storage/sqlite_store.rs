//! SQLite-backed key/value store.
//!
//! Durable home of the settings fallback records and, with the default token
//! backend, the persistent credential tier. Connections come from an r2d2
//! pool; each operation is a single statement.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use tracing::{debug, info};
use workbase_core::KeyValueStore;
use workbase_domain::{Result, WorkbaseError};

use crate::errors::InfraError;

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");
const DEFAULT_POOL_SIZE: u32 = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pooled SQLite key/value store
pub struct SqliteKeyValueStore {
    pool: Pool<SqliteConnectionManager>,
    path: Option<PathBuf>,
}

impl SqliteKeyValueStore {
    /// Open (creating if needed) the database file at `path` and migrate it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                WorkbaseError::Storage(format!("cannot create {}: {err}", parent.display()))
            })?;
        }

        let manager =
            SqliteConnectionManager::file(&path).with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
        let pool = Pool::builder().max_size(DEFAULT_POOL_SIZE).build(manager).map_err(map_pool_error)?;

        let store = Self { pool, path: Some(path) };
        store.run_migrations()?;
        info!(db_path = ?store.path, "key/value store opened");
        Ok(store)
    }

    /// Private in-memory database, mainly for tests.
    ///
    /// Pinned to a single connection since every SQLite memory connection is
    /// its own database.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).map_err(map_pool_error)?;
        let store = Self { pool, path: None };
        store.run_migrations()?;
        Ok(store)
    }

    /// Database file path; `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Ensure the schema exists.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, Utc::now().timestamp()],
        )
        .map_err(map_sql_error)?;
        Ok(())
    }

    /// Verify the database answers a trivial query.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0)).map_err(map_sql_error)?;
        Ok(())
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| row.get(0))
            .optional()
            .map_err(map_sql_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().timestamp()],
        )
        .map_err(map_sql_error)?;
        debug!(key, "kv entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key]).map_err(map_sql_error)?;
        Ok(())
    }
}

impl std::fmt::Debug for SqliteKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteKeyValueStore").field("path", &self.path).finish_non_exhaustive()
    }
}

fn map_sql_error(err: rusqlite::Error) -> WorkbaseError {
    WorkbaseError::from(InfraError::from(err))
}

fn map_pool_error(err: r2d2::Error) -> WorkbaseError {
    WorkbaseError::from(InfraError::from(err))
}
