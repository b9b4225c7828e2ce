//! Command-line surface: argument parsing plus the terminal shell that
//! drives the profile screen.

mod commands;
mod terminal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, SetCommand, ShowCommand, StatusCommand};
pub use terminal::{render_profile, run_shell, Terminal};

/// atithi - Keep your emergency profile ready while you travel
///
/// Stores the personal and medical details a responder needs, and checks
/// that the essentials are filled in before saving.
#[derive(Debug, Parser)]
#[command(name = "atithi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the saved profile
    Show(ShowCommand),

    /// List profile fields
    Fields,

    /// Edit one field and save
    Set(SetCommand),

    /// Edit the profile interactively
    Shell,

    /// Show storage status
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::FieldId;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Fields,
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "atithi");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show_json() {
        let cli = Cli::try_parse_from(["atithi", "show", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Show(ShowCommand { json: true })));
    }

    #[test]
    fn test_parse_set() {
        let cli = Cli::try_parse_from(["atithi", "set", "bloodGroup", "O+", "--force"]).unwrap();
        let Command::Set(cmd) = cli.command else {
            panic!("expected set command");
        };
        assert_eq!(cmd.field, FieldId::BloodGroup);
        assert_eq!(cmd.value, "O+");
        assert!(cmd.force);
        assert!(!cmd.no_input);
    }

    #[test]
    fn test_parse_set_rejects_unknown_field() {
        assert!(Cli::try_parse_from(["atithi", "set", "email", "a@b.c"]).is_err());
    }

    #[test]
    fn test_parse_set_force_conflicts_with_no_input() {
        let result = Cli::try_parse_from(["atithi", "set", "name", "Asha", "--force", "--no-input"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["atithi", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = Cli::try_parse_from(["atithi", "config", "validate", "-f", "x.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(["atithi", "-vv", "shell"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["atithi", "-q", "fields"]).unwrap();
        assert!(cli.quiet);
    }
}
