//! Zip bundles of exported contacts, one file per contact.

use std::collections::HashSet;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::ExportFormat;
use crate::error::RolodexResult;
use crate::model::Contact;

/// File name for a contact inside an archive or export directory:
/// the callsign with path-unsafe characters replaced, plus the format's extension.
pub fn file_name(contact: &Contact, format: ExportFormat) -> String {
    let stem: String = contact
        .callsign
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = if stem.is_empty() { "contact".to_string() } else { stem };
    format!("{}.{}", stem, format.extension())
}

/// Packs every contact into a zip archive. Callsigns are not unique, so
/// repeated names get a `-2`, `-3`, ... suffix.
pub fn pack(contacts: &[Contact], format: ExportFormat) -> RolodexResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut used: HashSet<String> = HashSet::new();

    for contact in contacts {
        let name = unique_name(&file_name(contact, format), &mut used);
        let body = format.encode(contact)?;
        writer.start_file(name, options)?;
        writer.write_all(body.as_bytes())?;
    }

    let cursor = writer.finish()?;
    debug!(entries = contacts.len(), format = %format, "archive packed");
    Ok(cursor.into_inner())
}

fn unique_name(candidate: &str, used: &mut HashSet<String>) -> String {
    let (stem, ext) = candidate.rsplit_once('.').unwrap_or((candidate, ""));
    let mut name = candidate.to_string();
    let mut n = 1;
    while !used.insert(name.to_lowercase()) {
        n += 1;
        name = format!("{}-{}.{}", stem, n, ext);
    }
    name
}

/// Reads every `.vcf` and `.json` entry, choosing the decoder by extension.
/// Other entries are skipped; entries that cannot be opened or decoded are
/// logged and skipped.
pub fn unpack(bytes: &[u8]) -> RolodexResult<Vec<Contact>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut contacts = Vec::new();

    for i in 0..archive.len() {
        let mut entry = match archive.by_index(i) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(index = i, error = %e, "unreadable archive entry");
                continue;
            }
        };
        let name = entry.name().to_string();
        if entry.is_dir() || is_metadata(&name) {
            continue;
        }
        let Some(format) = ExportFormat::from_path(Path::new(&name)) else {
            debug!(entry = %name, "skipping archive entry with unknown extension");
            continue;
        };

        let mut text = String::new();
        if let Err(e) = entry.read_to_string(&mut text) {
            warn!(entry = %name, error = %e, "unreadable archive entry");
            continue;
        }
        match format.decode(&text) {
            Ok(mut decoded) => contacts.append(&mut decoded),
            Err(e) => warn!(entry = %name, error = %e, "undecodable archive entry"),
        }
    }

    Ok(contacts)
}

/// Resource-fork files macOS adds to archives.
fn is_metadata(name: &str) -> bool {
    name.starts_with("__MACOSX/")
        || Path::new(name)
            .file_name()
            .and_then(|f| f.to_str())
            .is_some_and(|f| f.starts_with("._"))
}
