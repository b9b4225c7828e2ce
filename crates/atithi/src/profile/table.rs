//! The in-memory field table.

use serde::Serialize;

use super::fields::{FieldDef, FieldGroup, FieldId, InputKind, FIELD_DEFS};
use super::record::ProfileRecord;
use super::validation::ValidationWarning;

/// One profile field and its current value.
///
/// An empty `value` means the field is unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileField {
    /// Stable identifier.
    pub id: FieldId,
    /// Display label.
    pub label: &'static str,
    /// Input surface hint.
    pub input_kind: InputKind,
    /// Current value.
    pub value: String,
}

impl ProfileField {
    fn from_def(def: &FieldDef) -> Self {
        Self {
            id: def.id,
            label: def.label,
            input_kind: def.input_kind,
            value: String::new(),
        }
    }

    /// Check if the field has no value.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.value.is_empty()
    }

    /// The value, or `placeholder` when unset.
    #[must_use]
    pub fn display_value<'a>(&'a self, placeholder: &'a str) -> &'a str {
        if self.is_unset() {
            placeholder
        } else {
            &self.value
        }
    }

    /// Hint text shown in an empty input.
    #[must_use]
    pub fn prompt_placeholder(&self) -> String {
        format!("Enter your {}", self.label.to_lowercase())
    }
}

/// The ordered list of profile fields with their current values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldTable {
    fields: Vec<ProfileField>,
}

impl Default for FieldTable {
    fn default() -> Self {
        Self {
            fields: FIELD_DEFS.iter().map(ProfileField::from_def).collect(),
        }
    }
}

impl FieldTable {
    /// Create a table with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a persisted record.
    #[must_use]
    pub fn from_record(record: &ProfileRecord) -> Self {
        let mut table = Self::new();
        table.merge(record);
        table
    }

    /// All fields in table order.
    #[must_use]
    pub fn fields(&self) -> &[ProfileField] {
        &self.fields
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, id: FieldId) -> &ProfileField {
        // The table always holds every FieldId, in enum order.
        &self.fields[id as usize]
    }

    /// Current value of a field.
    #[must_use]
    pub fn value(&self, id: FieldId) -> &str {
        &self.get(id).value
    }

    /// Replace a field's value. Returns `true` if the value changed.
    pub fn set(&mut self, id: FieldId, value: impl Into<String>) -> bool {
        let value = value.into();
        let field = &mut self.fields[id as usize];
        if field.value == value {
            return false;
        }
        field.value = value;
        true
    }

    /// Fields of one section, in display order.
    pub fn group(&self, group: FieldGroup) -> impl Iterator<Item = &ProfileField> {
        group.fields().iter().map(|id| self.get(*id))
    }

    /// Required fields whose trimmed value is empty, in table order.
    #[must_use]
    pub fn missing_required(&self) -> Vec<FieldId> {
        FIELD_DEFS
            .iter()
            .filter(|def| def.required && self.value(def.id).trim().is_empty())
            .map(|def| def.id)
            .collect()
    }

    /// Check required fields, producing a warning if any are empty.
    #[must_use]
    pub fn validate(&self) -> Option<ValidationWarning> {
        let missing = self.missing_required();
        if missing.is_empty() {
            None
        } else {
            Some(ValidationWarning::new(missing))
        }
    }

    /// Project the table into its persisted form.
    ///
    /// Only fields with a non-empty value are included.
    #[must_use]
    pub fn project(&self) -> ProfileRecord {
        self.fields
            .iter()
            .filter(|field| !field.is_unset())
            .map(|field| (field.id.as_str().to_string(), field.value.clone()))
            .collect()
    }

    /// Overlay values from a persisted record.
    ///
    /// Unknown keys are ignored. Fields missing from the record, or stored
    /// as empty, keep their current value.
    pub fn merge(&mut self, record: &ProfileRecord) {
        for field in &mut self.fields {
            if let Some(value) = record.get(field.id.as_str()).filter(|v| !v.is_empty()) {
                field.value = value.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_all_defaults() {
        let table = FieldTable::new();
        assert_eq!(table.fields().len(), FIELD_DEFS.len());
        assert!(table.fields().iter().all(ProfileField::is_unset));
        assert!(table.project().is_empty());
    }

    #[test]
    fn test_set_reports_change() {
        let mut table = FieldTable::new();
        assert!(table.set(FieldId::BloodGroup, "O+"));
        assert!(!table.set(FieldId::BloodGroup, "O+"));
        assert_eq!(table.value(FieldId::BloodGroup), "O+");
    }

    #[test]
    fn test_project_skips_unset_fields() {
        let mut table = FieldTable::new();
        table.set(FieldId::Phone, "9999999999");

        let record = table.project();
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("phone"), Some("9999999999"));
        assert_eq!(record.get("name"), None);
    }

    #[test]
    fn test_project_then_rebuild_round_trips() {
        let mut table = FieldTable::new();
        table.set(FieldId::Name, "Asha Rao");
        table.set(FieldId::Allergies, "Peanuts\nShellfish");

        assert_eq!(FieldTable::from_record(&table.project()), table);
    }

    #[test]
    fn test_merge_ignores_unknown_and_keeps_defaults() {
        let record = ProfileRecord::from_bytes(
            br#"{"name":"Asha","bloodGroup":"","passport":"X123"}"#,
        )
        .unwrap();

        let table = FieldTable::from_record(&record);
        assert_eq!(table.value(FieldId::Name), "Asha");
        assert_eq!(table.value(FieldId::BloodGroup), "");
        assert_eq!(table.value(FieldId::Phone), "");
    }

    #[test]
    fn test_missing_required_trims_whitespace() {
        let mut table = FieldTable::new();
        table.set(FieldId::Name, "   ");
        table.set(FieldId::Phone, "9999999999");

        assert_eq!(
            table.missing_required(),
            vec![FieldId::Name, FieldId::EmergencyContact]
        );
    }

    #[test]
    fn test_validate_passes_when_required_present() {
        let mut table = FieldTable::new();
        table.set(FieldId::Name, "Asha");
        table.set(FieldId::Phone, "9999999999");
        table.set(FieldId::EmergencyContact, "8888888888");

        assert!(table.validate().is_none());
    }

    #[test]
    fn test_group_iterates_in_display_order() {
        let table = FieldTable::new();
        let ids: Vec<FieldId> = table.group(FieldGroup::Emergency).map(|f| f.id).collect();
        assert_eq!(
            ids,
            vec![
                FieldId::EmergencyContact,
                FieldId::Allergies,
                FieldId::Medications
            ]
        );
    }

    #[test]
    fn test_display_value_and_placeholder() {
        let mut table = FieldTable::new();
        let field = table.get(FieldId::EmergencyContact);
        assert_eq!(field.display_value("Not set"), "Not set");
        assert_eq!(field.prompt_placeholder(), "Enter your emergency contact");

        table.set(FieldId::EmergencyContact, "8888888888");
        assert_eq!(
            table.get(FieldId::EmergencyContact).display_value("Not set"),
            "8888888888"
        );
    }
}
