//! Required-field validation result.

use std::fmt;

use serde::Serialize;

use super::fields::FieldId;

/// Lead-in of the message shown when required fields are empty.
const MISSING_PREFIX: &str = "Please fill in the following required fields: ";

/// Required fields were empty when a save was requested.
///
/// This is never fatal: the user may go back to editing or save anyway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    missing: Vec<FieldId>,
}

impl ValidationWarning {
    /// Create a warning for the given missing fields.
    #[must_use]
    pub fn new(missing: Vec<FieldId>) -> Self {
        Self { missing }
    }

    /// The missing fields, in table order.
    #[must_use]
    pub fn missing(&self) -> &[FieldId] {
        &self.missing
    }

    /// Labels of the missing fields, in table order.
    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        self.missing.iter().map(|id| id.label()).collect()
    }

    /// User-facing message with labels joined by `separator`.
    #[must_use]
    pub fn message(&self, separator: &str) -> String {
        format!("{MISSING_PREFIX}{}", self.labels().join(separator))
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message(", "))
    }
}
