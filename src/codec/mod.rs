//! Import and export formats.

pub mod archive;
pub mod json;
pub mod vcard;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RolodexError, RolodexResult};
use crate::model::Contact;

/// Per-contact file format used for single exports and inside archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Vcf,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Vcf => "vcf",
            ExportFormat::Json => "json",
        }
    }

    /// The format implied by a file's extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "vcf" => Some(ExportFormat::Vcf),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn encode(&self, contact: &Contact) -> RolodexResult<String> {
        match self {
            ExportFormat::Vcf => Ok(vcard::encode(contact)),
            ExportFormat::Json => json::encode(contact),
        }
    }

    pub fn decode(&self, text: &str) -> RolodexResult<Vec<Contact>> {
        match self {
            ExportFormat::Vcf => Ok(vcard::decode_all(text)),
            ExportFormat::Json => json::decode(text),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = RolodexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vcf" | "vcard" => Ok(ExportFormat::Vcf),
            "json" => Ok(ExportFormat::Json),
            other => Err(RolodexError::UnsupportedFormat { name: other.to_string() }),
        }
    }
}

/// Reads contacts from a `.vcf`, `.json` or `.zip` file, chosen by extension.
pub fn import_file(path: &Path) -> RolodexResult<Vec<Contact>> {
    let is_zip = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"));

    let contacts = if is_zip {
        archive::unpack(&std::fs::read(path)?)?
    } else {
        let format = ExportFormat::from_path(path).ok_or_else(|| RolodexError::UnsupportedFormat {
            name: path.display().to_string(),
        })?;
        format.decode(&std::fs::read_to_string(path)?)?
    };

    info!(path = %path.display(), contacts = contacts.len(), "read import file");
    Ok(contacts)
}
