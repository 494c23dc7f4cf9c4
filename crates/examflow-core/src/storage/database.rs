//! SQLite-based durable storage.
//!
//! Provides persistent storage for:
//! - The sent-reminder ledger (key-value store, survives restarts)
//! - Cached static assets, keyed by cache version and path
//! - Miscellaneous application state

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{Result, StoreError};

/// A cached asset body plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAsset {
    pub path: String,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub fetched_at: String,
}

/// Asset metadata without the body, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetMeta {
    pub path: String,
    pub bytes: u64,
    pub content_type: Option<String>,
    pub fetched_at: String,
}

/// SQLite database backing the agent.
///
/// One connection, opened per process. SQLite serializes writers, which
/// is the only cross-process coordination the agent needs.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/examflow/examflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("examflow.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and ephemeral runs).
    pub fn open_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS assets (
                cache_name   TEXT NOT NULL,
                path         TEXT NOT NULL,
                body         BLOB NOT NULL,
                content_type TEXT,
                fetched_at   TEXT NOT NULL,
                PRIMARY KEY (cache_name, path)
            );

            -- Listing and purging walk the cache_name column
            CREATE INDEX IF NOT EXISTS idx_assets_cache_name ON assets(cache_name);",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Store an asset body under a cache version.
    pub fn asset_put(
        &self,
        cache_name: &str,
        path: &str,
        body: &[u8],
        content_type: Option<&str>,
    ) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO assets (cache_name, path, body, content_type, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![cache_name, path, body, content_type, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Look up an asset body by cache version and path.
    pub fn asset_get(
        &self,
        cache_name: &str,
        path: &str,
    ) -> Result<Option<CachedAsset>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT path, body, content_type, fetched_at
             FROM assets WHERE cache_name = ?1 AND path = ?2",
        )?;
        let result = stmt.query_row(params![cache_name, path], |row| {
            Ok(CachedAsset {
                path: row.get(0)?,
                body: row.get(1)?,
                content_type: row.get(2)?,
                fetched_at: row.get(3)?,
            })
        });
        match result {
            Ok(asset) => Ok(Some(asset)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// List the assets stored under a cache version.
    pub fn asset_list(&self, cache_name: &str) -> Result<Vec<AssetMeta>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT path, LENGTH(body), content_type, fetched_at
             FROM assets WHERE cache_name = ?1 ORDER BY path",
        )?;
        let rows = stmt.query_map(params![cache_name], |row| {
            Ok(AssetMeta {
                path: row.get(0)?,
                bytes: row.get(1)?,
                content_type: row.get(2)?,
                fetched_at: row.get(3)?,
            })
        })?;
        rows.collect()
    }

    /// Delete every asset not stored under `keep`. Returns the number of
    /// rows removed.
    pub fn asset_purge_except(&self, keep: &str) -> Result<usize, rusqlite::Error> {
        self.conn
            .execute("DELETE FROM assets WHERE cache_name != ?1", params![keep])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn asset_roundtrip() {
        let db = Database::open_memory().unwrap();
        assert!(db.asset_get("v1", "/index.html").unwrap().is_none());

        db.asset_put("v1", "/index.html", b"<html></html>", Some("text/html"))
            .unwrap();
        let asset = db.asset_get("v1", "/index.html").unwrap().unwrap();
        assert_eq!(asset.body, b"<html></html>");
        assert_eq!(asset.content_type.as_deref(), Some("text/html"));
    }

    #[test]
    fn put_replaces_existing_body() {
        let db = Database::open_memory().unwrap();
        db.asset_put("v1", "/", b"old", None).unwrap();
        db.asset_put("v1", "/", b"new", None).unwrap();
        let asset = db.asset_get("v1", "/").unwrap().unwrap();
        assert_eq!(asset.body, b"new");
        assert_eq!(db.asset_list("v1").unwrap().len(), 1);
    }

    #[test]
    fn purge_keeps_only_the_named_cache() {
        let db = Database::open_memory().unwrap();
        db.asset_put("v1", "/a", b"1", None).unwrap();
        db.asset_put("v1", "/b", b"2", None).unwrap();
        db.asset_put("v2", "/a", b"3", None).unwrap();

        let removed = db.asset_purge_except("v2").unwrap();
        assert_eq!(removed, 2);
        assert!(db.asset_get("v1", "/a").unwrap().is_none());
        assert!(db.asset_get("v2", "/a").unwrap().is_some());
    }

    #[test]
    fn list_is_sorted_and_has_sizes() {
        let db = Database::open_memory().unwrap();
        db.asset_put("v1", "/b", b"12345", None).unwrap();
        db.asset_put("v1", "/a", b"12", Some("text/plain")).unwrap();

        let listed = db.asset_list("v1").unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].path, "/a");
        assert_eq!(listed[0].bytes, 2);
        assert_eq!(listed[1].path, "/b");
        assert_eq!(listed[1].bytes, 5);
    }
}
