pub mod schema;
pub mod card_repo;

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::RolodexResult;

/// Opens (creating if needed) the database at `path` and ensures the schema exists.
pub fn open(path: &Path) -> RolodexResult<Connection> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
    }
    debug!(path = %path.display(), "opening card database");
    let conn = Connection::open(path)?;
    schema::initialize(&conn)?;
    Ok(conn)
}

/// Collection path holding one owner's cards.
pub fn collection_path(owner: &str) -> String {
    format!("users/{}/contacts", owner)
}
