use rusqlite::Connection;

use crate::error::RolodexResult;

/// Initialize the database schema. Creates all tables if they don't exist.
///
/// Cards are stored as JSON documents grouped by collection path
/// (`users/<owner>/contacts`), one row per document.
pub fn initialize(conn: &Connection) -> RolodexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS cards (
            id TEXT PRIMARY KEY NOT NULL,
            collection TEXT NOT NULL,
            document TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_cards_collection ON cards(collection);
        ",
    )?;
    Ok(())
}

/// In-memory connection with the schema applied, for tests.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
