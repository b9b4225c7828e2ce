//! The profile store.
//!
//! [`ProfileStore`] persists a [`ProfileRecord`] under a single storage
//! key and reads it back. It maps every storage failure onto the two
//! profile-level errors: [`Error::Load`] and [`Error::Persistence`].

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::profile::{FieldTable, ProfileRecord};
use crate::storage::{content_hash, KeyValueStore};

/// Storage key shared with the mobile app.
pub const DEFAULT_PROFILE_KEY: &str = "@atithi_secure_profile";

/// Reads and writes the profile record under one key.
#[derive(Debug)]
pub struct ProfileStore<S> {
    storage: S,
    key: String,
    skip_unchanged_writes: bool,
}

impl<S: KeyValueStore> ProfileStore<S> {
    /// Create a store writing under `key`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            skip_unchanged_writes: true,
        }
    }

    /// Set whether a write whose bytes match the stored hash is skipped.
    #[must_use]
    pub fn with_skip_unchanged_writes(mut self, skip: bool) -> Self {
        self.skip_unchanged_writes = skip;
        self
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the saved record. `Ok(None)` means nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if the storage cannot be read or the stored
    /// bytes are not a valid record.
    pub fn load(&self) -> Result<Option<ProfileRecord>> {
        let Some(bytes) = self
            .storage
            .get(&self.key)
            .map_err(|e| Error::load(&self.key, e))?
        else {
            debug!(key = %self.key, "No saved profile");
            return Ok(None);
        };

        let record = ProfileRecord::from_bytes(&bytes).map_err(|e| Error::load(&self.key, e))?;
        debug!(key = %self.key, entries = record.len(), "Loaded profile");
        Ok(Some(record))
    }

    /// Load the saved profile into a fresh table.
    ///
    /// Nothing saved, or a failed load, both yield the all-defaults table.
    /// Load failures are logged rather than returned.
    #[must_use]
    pub fn load_table(&self) -> FieldTable {
        match self.load() {
            Ok(Some(record)) => FieldTable::from_record(&record),
            Ok(None) => FieldTable::new(),
            Err(err) => {
                warn!(error = %err, "Falling back to an empty profile");
                FieldTable::new()
            }
        }
    }

    /// Write the full record in a single storage call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if serialization or the write fails.
    pub fn save(&self, record: &ProfileRecord) -> Result<()> {
        let bytes = record
            .to_bytes()
            .map_err(|e| Error::persistence(&self.key, e))?;

        if self.skip_unchanged_writes && self.is_unchanged(&bytes) {
            debug!(key = %self.key, "Profile unchanged, skipping write");
            return Ok(());
        }

        self.storage
            .set(&self.key, &bytes)
            .map_err(|e| Error::persistence(&self.key, e))?;

        info!(key = %self.key, entries = record.len(), "Profile saved");
        Ok(())
    }

    fn is_unchanged(&self, bytes: &[u8]) -> bool {
        match self.storage.digest(&self.key) {
            Ok(Some(stored)) => stored == content_hash(bytes),
            Ok(None) => false,
            Err(err) => {
                debug!(error = %err, "Could not read stored hash");
                false
            }
        }
    }
}
