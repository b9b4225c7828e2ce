//! Schema versioning.
//!
//! The storage schema is versioned in the `metadata` table. The profile
//! blob stored in `kv` is not versioned: it stays a flat string map so
//! records written by earlier releases load unchanged.

use rusqlite::{Connection, OptionalExtension};

use tracing::debug;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// Version written by this build.
pub const CURRENT_VERSION: i32 = 1;

/// `metadata` row holding the version.
const VERSION_KEY: &str = "schema_version";

/// Create missing tables and upgrade older databases to
/// [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns [`Error::DatabaseMigration`] or a `SQLite` error if an upgrade
/// step fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let version = get_schema_version(conn)?;
    if version < CURRENT_VERSION {
        run_migrations(conn, version)?;
    }

    Ok(())
}

/// Version recorded in `metadata`, or 0 for a database that has none.
///
/// # Errors
///
/// Returns an error if the metadata table cannot be read or holds a
/// malformed version.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    stored.map_or(Ok(0), |value| {
        value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        })
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT INTO metadata (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

fn run_migrations(conn: &Connection, from_version: i32) -> Result<()> {
    for version in (from_version + 1)..=CURRENT_VERSION {
        debug!(version, "Applying schema migration");
        run_migration(conn, version)?;
    }
    Ok(())
}

fn run_migration(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(Error::DatabaseMigration {
            message: format!("unknown migration version: {version}"),
        }),
    }
}

/// Version 1 is the `kv` table created by `SCHEMA_STATEMENTS`.
fn migrate_v1(conn: &Connection) -> Result<()> {
    set_schema_version(conn, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_db() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    fn create_metadata_table(conn: &Connection) {
        conn.execute(
            "CREATE TABLE metadata (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_fresh_database_gets_both_tables() {
        let conn = blank_db();
        initialize_schema(&conn).unwrap();

        for table in ["kv", "metadata"] {
            let count: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {table}");
        }
    }

    #[test]
    fn test_fresh_database_is_v1_with_content_hash() {
        let conn = blank_db();
        initialize_schema(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), 1);
        let columns: Vec<String> = conn
            .prepare("PRAGMA table_info(kv)")
            .unwrap()
            .query_map([], |row| row.get(1))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(columns, ["key", "value", "content_hash", "updated_at"]);
    }

    #[test]
    fn test_reopening_keeps_current_version() {
        let conn = blank_db();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_unversioned_database_reads_as_zero() {
        let conn = blank_db();
        create_metadata_table(&conn);
        assert_eq!(get_schema_version(&conn).unwrap(), 0);

        set_schema_version(&conn, 1).unwrap();
        set_schema_version(&conn, 2).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 2);
    }

    #[test]
    fn test_garbled_version_is_rejected() {
        let conn = blank_db();
        create_metadata_table(&conn);
        conn.execute(
            "INSERT INTO metadata (key, value) VALUES ('schema_version', 'two')",
            [],
        )
        .unwrap();

        let err = get_schema_version(&conn).unwrap_err();
        assert!(err.to_string().contains("invalid schema version"));
    }

    #[test]
    fn test_unknown_migration_step() {
        let conn = blank_db();
        initialize_schema(&conn).unwrap();

        let err = run_migration(&conn, 999).unwrap_err();
        assert!(err.to_string().contains("unknown migration version"));
    }
}
