//! Failures raised while loading, editing and saving the profile.
//!
//! Empty required fields are not an error; see
//! [`ValidationWarning`](crate::profile::ValidationWarning).

use std::path::PathBuf;
use thiserror::Error;

use crate::profile::FieldId;

/// The main error type for atithi operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// The profile database could not be opened.
    #[error("cannot open profile database {path}: {source}")]
    DatabaseOpen {
        /// Database file, or `:memory:`.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// `SQLite` rejected a statement.
    #[error("sqlite: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The stored schema could not be brought up to date.
    #[error("schema migration failed: {message}")]
    DatabaseMigration {
        /// What the migration tripped over.
        message: String,
    },

    /// The directory for the database file could not be created.
    #[error("cannot create data directory {path}: {source}")]
    DirectoryCreate {
        /// Directory that was being created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Profile Store Errors ===
    /// The profile could not be written. The in-memory table is untouched.
    #[error("failed to save profile under '{key}': {message}")]
    Persistence {
        /// Storage key the write targeted.
        key: String,
        /// Underlying cause.
        message: String,
    },

    /// The saved profile could not be read back.
    #[error("failed to load profile from '{key}': {message}")]
    Load {
        /// Storage key the read targeted.
        key: String,
        /// Underlying cause.
        message: String,
    },

    // === Configuration Errors ===
    /// A configuration layer could not be parsed.
    #[error("cannot read configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// The merged configuration is unusable.
    #[error("bad configuration: {message}")]
    ConfigValidation {
        /// Which setting is wrong.
        message: String,
    },

    // === Editing Errors ===
    /// A field id that is not part of the profile table.
    #[error("unknown profile field '{0}'")]
    UnknownField(String),

    /// An edit operation was issued with no field open for editing.
    #[error("no field is open for editing")]
    NoActiveSession,

    /// The table is locked while a save is in flight.
    #[error("a profile save is in progress; '{field}' cannot be edited")]
    SaveInProgress {
        /// Field the rejected mutation targeted.
        field: FieldId,
    },

    // === Other ===
    /// Terminal or file I/O failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A profile record could not be encoded or decoded.
    #[error("profile json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a persistence error for the given storage key.
    #[must_use]
    pub fn persistence(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Persistence {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create a load error for the given storage key.
    #[must_use]
    pub fn load(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Load {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Check if this error is a failed profile write.
    #[must_use]
    pub fn is_persistence_error(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }

    /// Check if this error was caused by an in-flight save.
    #[must_use]
    pub fn is_save_in_progress(&self) -> bool {
        matches!(self, Self::SaveInProgress { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoActiveSession;
        assert_eq!(err.to_string(), "no field is open for editing");

        let err = Error::UnknownField("shoeSize".to_string());
        assert_eq!(err.to_string(), "unknown profile field 'shoeSize'");
    }

    #[test]
    fn test_persistence_error() {
        let err = Error::persistence("@atithi_secure_profile", "disk full");
        assert!(err.is_persistence_error());
        assert!(!err.is_save_in_progress());

        let msg = err.to_string();
        assert!(msg.contains("@atithi_secure_profile"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_load_error_display() {
        let err = Error::load("@atithi_secure_profile", "expected value at line 1");
        assert!(!err.is_persistence_error());
        assert!(err.to_string().starts_with("failed to load profile"));
    }

    #[test]
    fn test_save_in_progress_error() {
        let err = Error::SaveInProgress {
            field: FieldId::Phone,
        };
        assert!(err.is_save_in_progress());
        assert!(err.to_string().contains("'phone'"));
    }

    #[test]
    fn test_corrupt_record_converts_to_json_error() {
        let decoded: std::result::Result<Vec<String>, serde_json::Error> =
            serde_json::from_slice(b"{\"name\":");
        let err: Error = decoded.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("profile json:"));
    }

    #[test]
    fn test_sqlite_error_converts() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err: Error = conn.execute("SELECT * FROM no_such_table", []).unwrap_err().into();
        assert!(matches!(err, Error::DatabaseQuery(_)));
    }

    #[test]
    fn test_data_directory_error_names_path() {
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/var/lib/atithi"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/var/lib/atithi"));
        assert!(msg.contains("denied"));
    }
}
