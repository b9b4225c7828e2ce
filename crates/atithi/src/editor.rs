//! Single-field edit session.
//!
//! An [`EditSession`] stages a new value for exactly one field. The field
//! table is only touched by [`EditSession::commit`]; dropping the session
//! discards the staged text.

use crate::profile::{FieldId, FieldTable};

/// A field open for editing, with its staged value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    field: FieldId,
    buffer: String,
}

impl EditSession {
    /// Open a session on `field`, seeded with its current value.
    #[must_use]
    pub fn open(table: &FieldTable, field: FieldId) -> Self {
        Self {
            field,
            buffer: table.value(field).to_string(),
        }
    }

    /// The field being edited.
    #[must_use]
    pub fn field(&self) -> FieldId {
        self.field
    }

    /// The staged value.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Replace the staged value.
    pub fn stage(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Write the staged value into the table, consuming the session.
    ///
    /// Returns `true` if the stored value changed. No validation happens
    /// here.
    pub fn commit(self, table: &mut FieldTable) -> bool {
        table.set(self.field, self.buffer)
    }
}
