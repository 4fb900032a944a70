//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::codec::ExportFormat;
use crate::hints::HintMode;
use crate::model::ToneMode;
use crate::sorts::SortKey;
use crate::view::ViewMode;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show cards whose callsign or name contains this text
    pub query: Option<String>,

    /// Sort to use instead of the configured one
    #[arg(short, long)]
    pub sort: Option<SortKey>,

    /// Layout to use instead of the configured one (column shows section tags)
    #[arg(long)]
    pub view: Option<ViewMode>,

    /// Print a callsign hint under each card
    #[arg(long)]
    pub hints: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Fields shared by `add` and `edit`. On edit, anything left out keeps its
/// current value.
#[derive(Debug, Args, Default)]
pub struct CardFields {
    /// Website; `https://` is added when no scheme is given
    #[arg(long)]
    pub website: Option<String>,

    /// Repeater location
    #[arg(long)]
    pub location: Option<String>,

    /// Repeater output frequency in MHz
    #[arg(long, allow_negative_numbers = true)]
    pub frequency: Option<f64>,

    /// Repeater offset in MHz
    #[arg(long, allow_negative_numbers = true)]
    pub offset: Option<f64>,

    /// Tone mode the radio transmits (CTCSS or DCS)
    #[arg(long, value_parser = parse_tone_mode)]
    pub tx_tone_mode: Option<ToneMode>,

    /// Transmit tone in Hz, or the DCS code
    #[arg(long)]
    pub tx_tone: Option<f64>,

    /// Tone mode the radio expects to receive (CTCSS or DCS)
    #[arg(long, value_parser = parse_tone_mode)]
    pub rx_tone_mode: Option<ToneMode>,

    /// Receive tone in Hz, or the DCS code
    #[arg(long)]
    pub rx_tone: Option<f64>,
}

impl CardFields {
    pub fn has_repeater_fields(&self) -> bool {
        self.location.is_some()
            || self.frequency.is_some()
            || self.offset.is_some()
            || self.tx_tone_mode.is_some()
            || self.tx_tone.is_some()
            || self.rx_tone_mode.is_some()
            || self.rx_tone.is_some()
    }
}

fn parse_tone_mode(s: &str) -> Result<ToneMode, String> {
    ToneMode::parse(s).ok_or_else(|| format!("unknown tone mode '{}' (expected CTCSS or DCS)", s))
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    pub callsign: String,

    /// Operator name, or the repeater's name
    #[arg(default_value = "")]
    pub name: String,

    /// Create a repeater card instead of a person
    #[arg(short, long)]
    pub repeater: bool,

    /// Star the new card
    #[arg(long)]
    pub star: bool,

    #[command(flatten)]
    pub fields: CardFields,
}

/// Card kinds selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CardTypeArg {
    Person,
    Repeater,
}

/// Optional fields `edit --clear` can remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClearField {
    Website,
    Frequency,
    Offset,
    TxToneMode,
    TxTone,
    RxToneMode,
    RxTone,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Card id, callsign, or part of a callsign or name
    pub card: String,

    #[arg(long)]
    pub callsign: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    /// Change the card type; switching to person drops the repeater fields
    #[arg(long = "type", value_enum)]
    pub card_type: Option<CardTypeArg>,

    #[command(flatten)]
    pub fields: CardFields,

    /// Remove an optional field
    #[arg(long, value_enum)]
    pub clear: Vec<ClearField>,
}

/// Arguments for commands that act on one card.
#[derive(Debug, Args)]
pub struct CardSelector {
    /// Card id, callsign, or part of a callsign or name
    pub card: String,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Card id, callsign, or part of a callsign or name
    pub card: String,

    /// Hint to print under the callsign instead of the configured one
    #[arg(long)]
    pub hint: Option<HintMode>,

    /// Look up the callsign's DMR id on radioid.net
    #[arg(long)]
    pub dmr: bool,

    /// Output the stored document as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Hint command arguments.
#[derive(Debug, Args)]
pub struct HintCommand {
    pub callsign: String,

    /// Hint style instead of the configured one
    #[arg(short, long)]
    pub mode: Option<HintMode>,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Cards to export; every card when none are given
    pub cards: Vec<String>,

    /// Per-contact format instead of the configured one
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Bundle into a zip archive even for a single card
    #[arg(short, long)]
    pub zip: bool,

    /// Output file; a single card goes to stdout and archives to
    /// `contacts.zip` when omitted
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// `.vcf`, `.json` or `.zip` files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Change one setting and save it
    Set {
        /// Dotted key, e.g. display.sort
        key: String,
        value: String,
    },

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}
