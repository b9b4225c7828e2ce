//! Profile screen controller and save coordinator.
//!
//! [`ProfileScreen`] owns everything the profile screen mutates: the field
//! table, the optional edit session, the dirty flag and the save-in-progress
//! flag. The surrounding shell drives it through two triggers,
//! [`ProfileScreen::open_editor`] and [`ProfileScreen::request_save`], and
//! lends it a [`Prompter`] for confirmations.
//!
//! Saving is split in two phases so a shell with asynchronous storage can
//! hold the screen between them: [`ProfileScreen::begin_save`] validates and
//! locks the table, [`ProfileScreen::finish_save`] applies the write result.
//! While a save is pending, table mutations fail with
//! [`Error::SaveInProgress`] and further save triggers are no-ops. A
//! [`PendingSave`] that will not be finished (the write was never issued,
//! or the task driving it was cancelled) must be handed to
//! [`ProfileScreen::abort_save`]; the lock is not released on drop.

use tracing::{debug, info, warn};

use crate::config::ProfileConfig;
use crate::editor::EditSession;
use crate::error::{Error, Result};
use crate::profile::{FieldId, FieldTable, ProfileRecord, ValidationWarning};
use crate::storage::KeyValueStore;
use crate::store::ProfileStore;

/// Whether a save checks required fields first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Stop with a [`ValidationWarning`] if required fields are empty.
    Checked,
    /// Save regardless of empty required fields.
    Force,
}

/// Result of [`ProfileScreen::begin_save`].
#[derive(Debug)]
pub enum SaveStep {
    /// A save is already in flight; nothing was done.
    Busy,
    /// Required fields are empty; the user must choose how to proceed.
    NeedsConfirmation(ValidationWarning),
    /// The table is locked and the record is ready to write.
    Ready(PendingSave),
}

/// A save that has been started and must be passed to
/// [`ProfileScreen::finish_save`] or [`ProfileScreen::abort_save`].
#[derive(Debug)]
#[must_use = "a pending save keeps the profile locked until finished or aborted"]
pub struct PendingSave {
    record: ProfileRecord,
}

impl PendingSave {
    /// The record to write.
    #[must_use]
    pub fn record(&self) -> &ProfileRecord {
        &self.record
    }
}

/// How a save request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The profile was written.
    Saved,
    /// Required fields are empty and the save was not forced.
    Blocked(ValidationWarning),
    /// Another save was in flight; this request was ignored.
    AlreadySaving,
}

/// How a request to leave the screen ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Nothing was unsaved; leave.
    Leave,
    /// The user chose to stay.
    Stay,
    /// Unsaved changes were dropped; leave.
    Discarded,
    /// Unsaved changes were written; leave.
    SavedAndLeft,
}

/// A user decision offered by a [`Prompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Dismiss the warning and return to editing.
    KeepEditing,
    /// Save despite empty required fields.
    SaveAnyway,
    /// Stay on the screen.
    Stay,
    /// Leave and drop unsaved changes.
    Discard,
    /// Save, then leave.
    SaveAndExit,
}

/// One labelled button of a [`Prompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    /// Button text.
    pub label: &'static str,
    /// What picking it means.
    pub resolution: Resolution,
}

/// A modal confirmation with two or three choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Dialog title.
    pub title: &'static str,
    /// Dialog body.
    pub message: String,
    /// Available choices, in display order.
    pub choices: Vec<Choice>,
}

impl Prompt {
    /// The dialog shown when required fields are empty.
    #[must_use]
    pub fn missing_information(warning: &ValidationWarning, separator: &str) -> Self {
        Self {
            title: "Missing Information",
            message: warning.message(separator),
            choices: vec![
                Choice {
                    label: "OK",
                    resolution: Resolution::KeepEditing,
                },
                Choice {
                    label: "Save Anyway",
                    resolution: Resolution::SaveAnyway,
                },
            ],
        }
    }

    /// The dialog shown when leaving with unsaved changes.
    #[must_use]
    pub fn unsaved_changes() -> Self {
        Self {
            title: "Unsaved Changes",
            message: "You have unsaved changes. Are you sure you want to leave?".to_string(),
            choices: vec![
                Choice {
                    label: "Stay",
                    resolution: Resolution::Stay,
                },
                Choice {
                    label: "Discard Changes",
                    resolution: Resolution::Discard,
                },
                Choice {
                    label: "Save & Exit",
                    resolution: Resolution::SaveAndExit,
                },
            ],
        }
    }
}

/// Presents a [`Prompt`] and reports the user's choice.
pub trait Prompter {
    /// Show `prompt` and return the resolution of the chosen button.
    fn choose(&mut self, prompt: &Prompt) -> Resolution;
}

impl<F: FnMut(&Prompt) -> Resolution> Prompter for F {
    fn choose(&mut self, prompt: &Prompt) -> Resolution {
        self(prompt)
    }
}

/// State and behaviour of the profile screen.
#[derive(Debug)]
pub struct ProfileScreen<S> {
    store: ProfileStore<S>,
    table: FieldTable,
    session: Option<EditSession>,
    dirty: bool,
    saving: bool,
    missing_separator: String,
}

impl<S: KeyValueStore> ProfileScreen<S> {
    /// Open the screen, loading the saved profile.
    ///
    /// A profile that cannot be loaded is replaced by empty fields.
    pub fn open(store: ProfileStore<S>, config: &ProfileConfig) -> Self {
        let table = store.load_table();
        Self {
            store,
            table,
            session: None,
            dirty: false,
            saving: false,
            missing_separator: config.missing_separator.clone(),
        }
    }

    /// The current field table.
    #[must_use]
    pub fn table(&self) -> &FieldTable {
        &self.table
    }

    /// The open edit session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Check if there are unsaved changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check if a save is in flight.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// The profile store.
    #[must_use]
    pub fn store(&self) -> &ProfileStore<S> {
        &self.store
    }

    /// Open `field` for editing, closing any session already open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SaveInProgress`] while a save is in flight.
    pub fn open_editor(&mut self, field: FieldId) -> Result<&EditSession> {
        self.ensure_idle(field)?;
        if let Some(prior) = self.session.take() {
            debug!(field = %prior.field(), "Closing prior edit session");
        }
        let session = EditSession::open(&self.table, field);
        Ok(&*self.session.insert(session))
    }

    /// Replace the staged text of the open session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveSession`] if nothing is open, or
    /// [`Error::SaveInProgress`] while a save is in flight.
    pub fn stage(&mut self, text: impl Into<String>) -> Result<()> {
        let field = self.active_field()?;
        self.ensure_idle(field)?;
        if let Some(session) = self.session.as_mut() {
            session.stage(text);
        }
        Ok(())
    }

    /// Write the staged text into the table and close the session.
    ///
    /// Returns `true` if the value changed, which marks the profile dirty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveSession`] if nothing is open, or
    /// [`Error::SaveInProgress`] while a save is in flight (the session
    /// stays open).
    pub fn commit_edit(&mut self) -> Result<bool> {
        let field = self.active_field()?;
        self.ensure_idle(field)?;
        let Some(session) = self.session.take() else {
            return Err(Error::NoActiveSession);
        };

        let changed = session.commit(&mut self.table);
        if changed {
            self.dirty = true;
            debug!(%field, "Field updated");
        }
        Ok(changed)
    }

    /// Close the open session without touching the table.
    ///
    /// Returns `true` if a session was closed. While a save is in flight
    /// nothing is closed and `false` is returned; a successful save closes
    /// the session itself.
    pub fn cancel_edit(&mut self) -> bool {
        if self.saving {
            debug!("Save in progress, keeping edit session open");
            return false;
        }
        self.session.take().is_some()
    }

    /// Start a save: validate, lock the table and project the record.
    pub fn begin_save(&mut self, mode: SaveMode) -> SaveStep {
        if self.saving {
            debug!("Save already in progress, ignoring trigger");
            return SaveStep::Busy;
        }

        if let Some(warning) = self.table.validate() {
            if mode == SaveMode::Checked {
                return SaveStep::NeedsConfirmation(warning);
            }
            let missing: Vec<&str> = warning.missing().iter().map(|id| id.as_str()).collect();
            warn!(?missing, "Saving profile with required fields empty");
        }

        self.saving = true;
        SaveStep::Ready(PendingSave {
            record: self.table.project(),
        })
    }

    /// Finish a save started by [`begin_save`](Self::begin_save).
    ///
    /// On success the dirty flag is cleared and any edit session closed.
    /// On failure the table and dirty flag are left as they were.
    ///
    /// # Errors
    ///
    /// Returns the write error, unchanged.
    pub fn finish_save(&mut self, pending: PendingSave, result: Result<()>) -> Result<()> {
        self.saving = false;
        match result {
            Ok(()) => {
                self.dirty = false;
                self.session = None;
                info!(entries = pending.record.len(), "Profile changes committed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Profile save failed, keeping unsaved changes");
                Err(err)
            }
        }
    }

    /// Release a save started by [`begin_save`](Self::begin_save) whose
    /// write was never made.
    ///
    /// The table, dirty flag and edit session are left as they were.
    pub fn abort_save(&mut self, pending: PendingSave) {
        self.saving = false;
        debug!(entries = pending.record.len(), "Profile save aborted");
    }

    /// Run a full save against the owned store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the write fails.
    pub fn save(&mut self, mode: SaveMode) -> Result<SaveOutcome> {
        match self.begin_save(mode) {
            SaveStep::Busy => Ok(SaveOutcome::AlreadySaving),
            SaveStep::NeedsConfirmation(warning) => Ok(SaveOutcome::Blocked(warning)),
            SaveStep::Ready(pending) => {
                let result = self.store.save(pending.record());
                self.finish_save(pending, result)?;
                Ok(SaveOutcome::Saved)
            }
        }
    }

    /// Save on the user's request, asking before saving with empty
    /// required fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the write fails.
    pub fn request_save(&mut self, prompter: &mut impl Prompter) -> Result<SaveOutcome> {
        match self.save(SaveMode::Checked)? {
            SaveOutcome::Blocked(warning) => {
                let prompt = Prompt::missing_information(&warning, &self.missing_separator);
                match prompter.choose(&prompt) {
                    Resolution::SaveAnyway => self.save(SaveMode::Force),
                    _ => Ok(SaveOutcome::Blocked(warning)),
                }
            }
            outcome => Ok(outcome),
        }
    }

    /// Ask to leave the screen, confirming if there are unsaved changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if "Save & Exit" was chosen and the
    /// write failed; the caller should stay on the screen.
    pub fn request_leave(&mut self, prompter: &mut impl Prompter) -> Result<LeaveOutcome> {
        if !self.dirty {
            return Ok(LeaveOutcome::Leave);
        }
        if self.saving {
            return Ok(LeaveOutcome::Stay);
        }

        match prompter.choose(&Prompt::unsaved_changes()) {
            Resolution::Discard => {
                self.table = self.store.load_table();
                self.session = None;
                self.dirty = false;
                info!("Unsaved profile changes discarded");
                Ok(LeaveOutcome::Discarded)
            }
            Resolution::SaveAndExit => match self.save(SaveMode::Force)? {
                SaveOutcome::Saved => Ok(LeaveOutcome::SavedAndLeft),
                SaveOutcome::Blocked(_) | SaveOutcome::AlreadySaving => Ok(LeaveOutcome::Stay),
            },
            _ => Ok(LeaveOutcome::Stay),
        }
    }

    fn active_field(&self) -> Result<FieldId> {
        self.session
            .as_ref()
            .map(EditSession::field)
            .ok_or(Error::NoActiveSession)
    }

    fn ensure_idle(&self, field: FieldId) -> Result<()> {
        if self.saving {
            Err(Error::SaveInProgress { field })
        } else {
            Ok(())
        }
    }
}
