//! Arguments of the `atithi` subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::profile::FieldId;

/// `atithi show`
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// `atithi set <field> <value>`
#[derive(Debug, Args)]
pub struct SetCommand {
    /// Field id (e.g. name, phone, bloodGroup, emergencyContact)
    #[arg(value_parser = parse_field)]
    pub field: FieldId,

    /// New value; an empty string clears the field
    pub value: String,

    /// Save even if required fields are empty
    #[arg(short, long, conflicts_with = "no_input")]
    pub force: bool,

    /// Never prompt; abort if required fields are empty
    #[arg(long)]
    pub no_input: bool,
}

/// `atithi status`
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// `atithi config ...`
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn parse_field(raw: &str) -> Result<FieldId, String> {
    raw.parse().map_err(|_| {
        let known: Vec<&str> = FieldId::ALL.iter().map(|id| id.as_str()).collect();
        format!("unknown field '{raw}' (expected one of: {})", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_known() {
        assert_eq!(parse_field("emergencyContact"), Ok(FieldId::EmergencyContact));
    }

    #[test]
    fn test_parse_field_unknown_lists_choices() {
        let err = parse_field("email").unwrap_err();
        assert!(err.contains("'email'"));
        assert!(err.contains("bloodGroup"));
    }

    #[test]
    fn test_set_command_debug() {
        let cmd = SetCommand {
            field: FieldId::Phone,
            value: "9999999999".to_string(),
            force: false,
            no_input: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Phone"));
        assert!(debug_str.contains("no_input"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
