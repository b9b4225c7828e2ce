//! `atithi` - Emergency profile editor for travellers
//!
//! This library holds a tourist's emergency-relevant personal data as a
//! fixed table of fields, lets one field at a time be edited, checks that
//! the essentials are filled in, and persists the profile to local storage.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod profile;
pub mod screen;
pub mod storage;
pub mod store;

pub use config::Config;
pub use editor::EditSession;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use profile::{FieldGroup, FieldId, FieldTable, ProfileRecord, ValidationWarning};
pub use screen::{LeaveOutcome, ProfileScreen, Prompt, Prompter, Resolution, SaveMode, SaveOutcome};
pub use storage::{KeyValueStore, SqliteStore, StorageStats};
pub use store::ProfileStore;
