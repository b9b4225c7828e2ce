//! SQL for the on-disk key-value layout.

/// One row per key; `value` holds the whole serialized record.
pub const CREATE_KV_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    content_hash TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// Bookkeeping such as the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Upsert of a single key. One statement, so a write is never partial.
pub const UPSERT_KV: &str = r"
INSERT INTO kv (key, value, content_hash, updated_at)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(key) DO UPDATE SET
    value = excluded.value,
    content_hash = excluded.content_hash,
    updated_at = excluded.updated_at
";

/// Run on every open, in this order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_KV_TABLE, CREATE_METADATA_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_kv_table_contains_required_columns() {
        assert!(CREATE_KV_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_KV_TABLE.contains("value BLOB NOT NULL"));
        assert!(CREATE_KV_TABLE.contains("content_hash TEXT"));
        assert!(CREATE_KV_TABLE.contains("updated_at TEXT NOT NULL"));
    }

    #[test]
    fn test_upsert_touches_every_column() {
        for column in ["value", "content_hash", "updated_at"] {
            assert!(UPSERT_KV.contains(&format!("{column} = excluded.{column}")));
        }
    }
}
