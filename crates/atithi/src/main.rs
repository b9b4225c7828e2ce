//! `atithi` - CLI for the emergency profile
//!
//! This binary provides the command-line interface for viewing and editing
//! the locally stored profile.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;

use anyhow::{bail, Context};
use clap::Parser;

use atithi::cli::{render_profile, run_shell, Cli, Command, ConfigCommand, SetCommand, Terminal};
use atithi::profile::FIELD_DEFS;
use atithi::{init_logging, Config, ProfileScreen, ProfileStore, SaveMode, SaveOutcome, SqliteStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Show(show_cmd) => handle_show(&config, show_cmd.json),
        Command::Fields => {
            handle_fields();
            Ok(())
        }
        Command::Set(set_cmd) => handle_set(&config, &set_cmd),
        Command::Shell => handle_shell(&config),
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_storage(config: &Config) -> anyhow::Result<SqliteStore> {
    let path = config.database_path();
    SqliteStore::open(&path)
        .with_context(|| format!("failed to open profile database at {}", path.display()))
}

fn open_screen(config: &Config) -> anyhow::Result<ProfileScreen<SqliteStore>> {
    let store = ProfileStore::new(open_storage(config)?, &config.storage.profile_key)
        .with_skip_unchanged_writes(config.storage.skip_unchanged_writes);
    Ok(ProfileScreen::open(store, &config.profile))
}

fn handle_show(config: &Config, json: bool) -> anyhow::Result<()> {
    let screen = open_screen(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(screen.table())?);
    } else {
        print!(
            "{}",
            render_profile(screen.table(), &config.profile.unset_placeholder)
        );
    }
    Ok(())
}

fn handle_fields() {
    for def in &FIELD_DEFS {
        println!(
            "{:<18} {:<20} {:<10} {}",
            def.id.as_str(),
            def.label,
            def.input_kind,
            if def.required { "required" } else { "" }
        );
    }
}

fn handle_set(config: &Config, cmd: &SetCommand) -> anyhow::Result<()> {
    let mut screen = open_screen(config)?;

    screen.open_editor(cmd.field)?;
    screen.stage(cmd.value.as_str())?;
    if !screen.commit_edit()? {
        println!("{} is unchanged.", cmd.field.label());
        return Ok(());
    }

    let outcome = if cmd.force {
        screen.save(SaveMode::Force)?
    } else if cmd.no_input {
        screen.save(SaveMode::Checked)?
    } else {
        let stdin = io::stdin();
        let mut terminal = Terminal::new(stdin.lock(), io::stdout());
        screen.request_save(&mut terminal)?
    };

    match outcome {
        SaveOutcome::Saved => {
            println!("Profile saved.");
            Ok(())
        }
        SaveOutcome::Blocked(warning) => {
            bail!(
                "profile not saved. {}",
                warning.message(&config.profile.missing_separator)
            )
        }
        SaveOutcome::AlreadySaving => bail!("profile not saved: another save is in progress"),
    }
}

fn handle_shell(config: &Config) -> anyhow::Result<()> {
    let mut screen = open_screen(config)?;
    let stdin = io::stdin();
    let mut terminal = Terminal::new(stdin.lock(), io::stdout());
    run_shell(&mut screen, &mut terminal, &config.profile.unset_placeholder)?;
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let stats = storage.stats()?;
    let saved = storage.updated_at(&config.storage.profile_key)?;

    if json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "profile_key": config.storage.profile_key,
            "schema_version": stats.schema_version,
            "profile_saved_at": saved,
            "entries": stats.entries,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("atithi status");
        println!("-------------");
        println!("Database:      {}", storage.path().display());
        println!("Schema:        v{}", stats.schema_version);
        println!("Profile key:   {}", config.storage.profile_key);
        match saved {
            Some(at) => println!("Last saved:    {}", at.to_rfc3339()),
            None => println!("Last saved:    never"),
        }
        println!("Size:          {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:         {}", config.database_path().display());
                println!("  Profile key:           {}", config.storage.profile_key);
                println!(
                    "  Skip unchanged writes: {}",
                    config.storage.skip_unchanged_writes
                );
                println!();
                println!("[Profile]");
                println!(
                    "  Missing separator:     {:?}",
                    config.profile.missing_separator
                );
                println!(
                    "  Unset placeholder:     {:?}",
                    config.profile.unset_placeholder
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
