//! The fixed field definition table.
//!
//! The set of profile fields is closed: every field is a [`FieldId`]
//! variant, and [`FIELD_DEFS`] lists their definitions in display order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Stable identifier of a profile field.
///
/// The string form (see [`FieldId::as_str`]) is the key used in the
/// persisted record and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    /// Full name of the traveller.
    Name,
    /// Traveller's own phone number.
    Phone,
    /// Blood group, e.g. `O+`.
    BloodGroup,
    /// Phone number of the person to call in an emergency.
    EmergencyContact,
    /// Known allergies.
    Allergies,
    /// Medications currently taken.
    Medications,
}

impl FieldId {
    /// All field ids in table order.
    pub const ALL: [FieldId; 6] = [
        Self::Name,
        Self::Phone,
        Self::BloodGroup,
        Self::EmergencyContact,
        Self::Allergies,
        Self::Medications,
    ];

    /// The persisted key of this field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::BloodGroup => "bloodGroup",
            Self::EmergencyContact => "emergencyContact",
            Self::Allergies => "allergies",
            Self::Medications => "medications",
        }
    }

    /// The static definition of this field.
    #[must_use]
    pub fn def(self) -> &'static FieldDef {
        // FIELD_DEFS is ordered like the enum.
        &FIELD_DEFS[self as usize]
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        self.def().label
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// How a field's input surface should be rendered.
///
/// This never affects what is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Single-line free text.
    Text,
    /// Digits only.
    Numeric,
    /// Phone keypad.
    Phone,
    /// Multi-line free text.
    Multiline,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Numeric => write!(f, "numeric"),
            Self::Phone => write!(f, "phone"),
            Self::Multiline => write!(f, "multiline"),
        }
    }
}

/// Static description of one profile field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Stable identifier.
    pub id: FieldId,
    /// Display label.
    pub label: &'static str,
    /// Input surface hint.
    pub input_kind: InputKind,
    /// Whether an empty value triggers a validation warning on save.
    pub required: bool,
}

/// Every profile field, in table order.
pub static FIELD_DEFS: [FieldDef; 6] = [
    FieldDef {
        id: FieldId::Name,
        label: "Full Name",
        input_kind: InputKind::Text,
        required: true,
    },
    FieldDef {
        id: FieldId::Phone,
        label: "Phone Number",
        input_kind: InputKind::Phone,
        required: true,
    },
    FieldDef {
        id: FieldId::BloodGroup,
        label: "Blood Group",
        input_kind: InputKind::Text,
        required: false,
    },
    FieldDef {
        id: FieldId::EmergencyContact,
        label: "Emergency Contact",
        input_kind: InputKind::Phone,
        required: true,
    },
    FieldDef {
        id: FieldId::Allergies,
        label: "Allergies",
        input_kind: InputKind::Multiline,
        required: false,
    },
    FieldDef {
        id: FieldId::Medications,
        label: "Current Medications",
        input_kind: InputKind::Multiline,
        required: false,
    },
];

/// A titled section of the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    /// Identity and contact details.
    Personal,
    /// Information a responder needs.
    Emergency,
}

impl FieldGroup {
    /// All groups in display order.
    pub const ALL: [FieldGroup; 2] = [Self::Personal, Self::Emergency];

    /// Section heading.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Personal => "Personal Information",
            Self::Emergency => "Emergency Information",
        }
    }

    /// Fields of this group, in display order.
    #[must_use]
    pub fn fields(self) -> &'static [FieldId] {
        match self {
            Self::Personal => &[FieldId::Name, FieldId::Phone, FieldId::BloodGroup],
            Self::Emergency => &[
                FieldId::EmergencyContact,
                FieldId::Allergies,
                FieldId::Medications,
            ],
        }
    }
}
