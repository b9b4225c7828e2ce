//! Profile data model.
//!
//! A tourist's emergency-relevant personal data is a fixed table of
//! fields. This module holds the field definitions, the in-memory table,
//! its persisted projection and the required-field check.

mod fields;
mod record;
mod table;
mod validation;

pub use fields::{FieldDef, FieldGroup, FieldId, InputKind, FIELD_DEFS};
pub use record::ProfileRecord;
pub use table::{FieldTable, ProfileField};
pub use validation::ValidationWarning;
