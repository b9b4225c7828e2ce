//! Local key-value persistence.
//!
//! [`KeyValueStore`] is the platform storage capability the profile store
//! consumes: whole-value `get` and `set` per key, each atomic on its own.
//! [`SqliteStore`] is the `SQLite`-backed implementation.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

const MEMORY_PATH: &str = ":memory:";

/// Compute the BLAKE3 hash of a stored value, hex encoded.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Key-value storage with whole-value reads and writes.
///
/// There are no transactional guarantees across calls.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Hash of the value stored under `key`, as produced by [`content_hash`].
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn digest(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key)?.map(|bytes| content_hash(&bytes)))
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn digest(&self, key: &str) -> Result<Option<String>> {
        (**self).digest(key)
    }
}

/// `SQLite`-backed key-value storage.
#[derive(Debug)]
pub struct SqliteStore {
    path: PathBuf,
    conn: Connection,
}

impl SqliteStore {
    /// Open the profile database at `path`, creating it and any missing
    /// parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirectoryCreate`], [`Error::DatabaseOpen`] or a
    /// migration error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                std::fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
            _ => {}
        }

        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!(path = %path.display(), "Profile database ready");
        Ok(Self { path, conn })
    }

    /// A throwaway database that lives as long as the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseOpen`] if `SQLite` cannot allocate it.
    pub fn open_in_memory() -> Result<Self> {
        let path = PathBuf::from(MEMORY_PATH);
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;
        migrations::initialize_schema(&conn)?;
        debug!("Opened in-memory profile database");
        Ok(Self { path, conn })
    }

    /// Database file, or `:memory:`.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Schema version recorded in the database.
    ///
    /// # Errors
    ///
    /// Returns a `SQLite` or migration error if `metadata` is unreadable.
    pub fn schema_version(&self) -> Result<i32> {
        migrations::get_schema_version(&self.conn)
    }

    /// When `key` was last written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseQuery`] on `SQLite` failure.
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT updated_at FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(raw.as_deref().and_then(parse_timestamp))
    }

    /// Summary for `atithi status`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseQuery`] on `SQLite` failure.
    pub fn stats(&self) -> Result<StorageStats> {
        let entries: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;

        let latest: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv ORDER BY updated_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let db_size_bytes = if self.path == Path::new(MEMORY_PATH) {
            0
        } else {
            std::fs::metadata(&self.path).map_or(0, |meta| meta.len())
        };

        Ok(StorageStats {
            entries,
            schema_version: self.schema_version()?,
            last_updated: latest.as_deref().and_then(parse_timestamp),
            db_size_bytes,
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let hash = content_hash(value);
        self.conn.execute(
            schema::UPSERT_KV,
            params![key, value, hash, Utc::now().to_rfc3339()],
        )?;
        debug!(key, bytes = value.len(), "Wrote value");
        Ok(())
    }

    fn digest(&self, key: &str) -> Result<Option<String>> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT content_hash FROM kv WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(stored)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// What `atithi status` reports about the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of stored keys.
    pub entries: i64,
    /// Schema version of the database.
    pub schema_version: i32,
    /// Time of the most recent write.
    pub last_updated: Option<DateTime<Utc>>,
    /// File size; 0 in memory.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_memory_store_is_migrated() {
        let storage = memory_store();
        assert_eq!(storage.path().to_string_lossy(), ":memory:");
        assert_eq!(
            storage.schema_version().unwrap(),
            migrations::CURRENT_VERSION
        );
    }

    #[test]
    fn test_get_missing_key() {
        let storage = memory_store();
        assert!(storage.get("absent").unwrap().is_none());
        assert!(storage.digest("absent").unwrap().is_none());
        assert!(storage.updated_at("absent").unwrap().is_none());
    }

    #[test]
    fn test_set_and_get() {
        let storage = memory_store();
        storage.set("profile", br#"{"name":"Asha"}"#).unwrap();

        assert_eq!(
            storage.get("profile").unwrap().as_deref(),
            Some(&br#"{"name":"Asha"}"#[..])
        );
        assert!(storage.updated_at("profile").unwrap().is_some());
    }

    #[test]
    fn test_set_overwrites_whole_value() {
        let storage = memory_store();
        storage.set("profile", b"first value").unwrap();
        storage.set("profile", b"second").unwrap();

        assert_eq!(storage.get("profile").unwrap().unwrap(), b"second");
        assert_eq!(storage.stats().unwrap().entries, 1);
    }

    #[test]
    fn test_digest_matches_content_hash() {
        let storage = memory_store();
        storage.set("profile", b"{}").unwrap();

        assert_eq!(storage.digest("profile").unwrap(), Some(content_hash(b"{}")));
    }

    #[test]
    fn test_content_hash_consistency() {
        assert_eq!(content_hash(b"abc"), content_hash(b"abc"));
        assert_ne!(content_hash(b"abc"), content_hash(b"abd"));
    }

    #[test]
    fn test_stats_before_first_save() {
        let storage = memory_store();
        let stats = storage.stats().unwrap();

        assert_eq!(stats.entries, 0);
        assert!(stats.last_updated.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_profile_survives_reopen() {
        let db_path = std::env::temp_dir().join(format!("atithi_reopen_{}.db", std::process::id()));

        {
            let storage = SqliteStore::open(&db_path).unwrap();
            storage.set("profile", b"{\"phone\":\"9999999999\"}").unwrap();
            assert_eq!(storage.path(), db_path);
            assert!(storage.stats().unwrap().db_size_bytes > 0);
        }

        let reopened = SqliteStore::open(&db_path).unwrap();
        assert_eq!(
            reopened.get("profile").unwrap().unwrap(),
            b"{\"phone\":\"9999999999\"}"
        );

        drop(reopened);
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", db_path.display()));
        }
    }

    #[test]
    fn test_open_creates_data_directory() {
        let root = std::env::temp_dir().join(format!("atithi_dirs_{}", std::process::id()));
        let db_path = root.join("share/atithi/profile.db");
        let _ = std::fs::remove_dir_all(&root);

        let storage = SqliteStore::open(&db_path).unwrap();
        assert!(db_path.exists());

        drop(storage);
        let _ = std::fs::remove_dir_all(&root);
    }
}
