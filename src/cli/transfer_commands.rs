use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::cli::commands::{ExportCommand, ImportCommand};
use crate::cli::context::CLIContext;
use crate::codec::{self, archive};
use crate::error::{RolodexError, RolodexResult};
use crate::model::{Card, Contact};
use crate::ops::card_ops::ImportStats;

/// Archive name used when `--output` is not given.
const ARCHIVE_NAME: &str = "contacts.zip";

/// Exports one card as a single file, or several as a zip archive.
pub fn export(ctx: &CLIContext, cmd: &ExportCommand) -> RolodexResult<()> {
    let format = cmd.format.unwrap_or(ctx.config.export.format);
    let cards: Vec<Card> = if cmd.cards.is_empty() {
        ctx.store.cards().to_vec()
    } else {
        cmd.cards
            .iter()
            .map(|query| ctx.find_card(query))
            .collect::<RolodexResult<_>>()?
    };

    if cards.is_empty() {
        println!("Nothing to export.");
        return Ok(());
    }

    if cards.len() == 1 && !cmd.zip {
        let card = &cards[0];
        let body = format.encode(card)?;
        match &cmd.output {
            Some(path) => {
                fs::write(path, &body)?;
                println!("Exported {} to {}", card.callsign, path.display());
            }
            None => {
                print!("{}", body);
                if !body.ends_with('\n') {
                    println!();
                }
            }
        }
        return Ok(());
    }

    let contacts: Vec<Contact> = cards.into_iter().map(|c| c.contact).collect();
    let bytes = archive::pack(&contacts, format)?;
    let path = cmd.output.clone().unwrap_or_else(|| PathBuf::from(ARCHIVE_NAME));
    fs::write(&path, bytes)?;
    info!(path = %path.display(), cards = contacts.len(), format = %format, "archive written");
    println!("Exported {} cards to {}", contacts.len(), path.display());
    Ok(())
}

/// Imports every file given. A file that cannot be read is reported and the
/// rest still go through.
pub fn import(ctx: &mut CLIContext, cmd: &ImportCommand) -> RolodexResult<()> {
    let mut total = ImportStats::default();
    let mut failed = 0;

    for path in &cmd.files {
        let result = codec::import_file(path).and_then(|contacts| ctx.store.import(contacts));
        match result {
            Ok(stats) => {
                println!(
                    "{}: imported {}, skipped {}",
                    path.display(),
                    stats.imported,
                    stats.skipped
                );
                total.imported += stats.imported;
                total.skipped += stats.skipped;
            }
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    if cmd.files.len() > 1 {
        println!("Total: imported {}, skipped {}", total.imported, total.skipped);
    }
    if failed > 0 {
        return Err(RolodexError::Other(format!("{} file(s) could not be imported", failed)));
    }
    Ok(())
}
