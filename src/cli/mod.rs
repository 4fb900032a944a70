//! Command-line interface for rolodex.

pub mod card_commands;
mod commands;
pub mod config_commands;
pub mod context;
pub mod transfer_commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

pub use commands::{
    AddCommand, CardFields, CardSelector, CardTypeArg, ClearField, ConfigCommand, EditCommand, ExportCommand,
    HintCommand, ImportCommand, ListCommand, ShowCommand,
};

use crate::config::Config;
use crate::db;
use crate::error::RolodexResult;
use crate::logging::Verbosity;
use crate::store::CardStore;
use context::CLIContext;

/// rolodex - A card file for amateur radio contacts and repeaters
#[derive(Debug, Parser)]
#[command(name = "rolodex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List cards using a sort and optional search
    List(ListCommand),

    /// Show one card in full
    Show(ShowCommand),

    /// Add a person or repeater card
    Add(AddCommand),

    /// Change fields of a card
    Edit(EditCommand),

    /// Delete a card
    Delete(CardSelector),

    /// Star a card so it sorts first
    Star(CardSelector),

    /// Remove the star from a card
    Unstar(CardSelector),

    /// List the available sorts
    Sorts,

    /// Spell a callsign in NATO phonetics or Morse code
    Hint(HintCommand),

    /// Export cards as vCard or JSON, or a zip of either
    Export(ExportCommand),

    /// Import cards from .vcf, .json or .zip files
    Import(ImportCommand),

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

/// Loads configuration and runs one command. Only the card commands open the
/// database.
pub fn run(cli: Cli) -> RolodexResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_config_path);
    let config = Config::load_from(Some(config_path.clone()))?;

    match cli.command {
        Command::List(cmd) => card_commands::list(&open(config, config_path)?, &cmd),
        Command::Show(cmd) => card_commands::show(&open(config, config_path)?, &cmd),
        Command::Add(cmd) => card_commands::add(&mut open(config, config_path)?, cmd),
        Command::Edit(cmd) => card_commands::edit(&mut open(config, config_path)?, cmd),
        Command::Delete(cmd) => card_commands::delete(&mut open(config, config_path)?, &cmd),
        Command::Star(cmd) => card_commands::star(&mut open(config, config_path)?, &cmd, true),
        Command::Unstar(cmd) => card_commands::star(&mut open(config, config_path)?, &cmd, false),
        Command::Sorts => {
            card_commands::sorts(config.display.sort);
            Ok(())
        }
        Command::Hint(cmd) => {
            card_commands::hint(&config, &cmd);
            Ok(())
        }
        Command::Export(cmd) => transfer_commands::export(&open(config, config_path)?, &cmd),
        Command::Import(cmd) => transfer_commands::import(&mut open(config, config_path)?, &cmd),
        Command::Config(cmd) => config_commands::handle(&config, &config_path, cmd),
    }
}

fn open(config: Config, config_path: PathBuf) -> RolodexResult<CLIContext> {
    let db_path = config.database_path();
    debug!(path = %db_path.display(), "opening database");
    let conn = db::open(&db_path)?;
    let store = CardStore::open(conn, &config.storage.owner)?;
    Ok(CLIContext::new(store, config, config_path))
}
