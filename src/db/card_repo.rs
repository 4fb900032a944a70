use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::{RolodexError, RolodexResult};
use crate::model::{Card, Contact, Id};

pub fn insert(conn: &Connection, collection: &str, card: &Card) -> RolodexResult<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO cards (id, collection, document, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
        params![
            card.id.value.to_string(),
            collection,
            serde_json::to_string(&card.contact)?,
            now,
        ],
    )?;
    Ok(())
}

/// Overwrites the whole document of an existing card. Returns false if no
/// card with that id exists in the collection.
pub fn replace(conn: &Connection, collection: &str, card: &Card) -> RolodexResult<bool> {
    let changed = conn.execute(
        "UPDATE cards SET document = ?1, updated_at = ?2 WHERE id = ?3 AND collection = ?4",
        params![
            serde_json::to_string(&card.contact)?,
            Utc::now().to_rfc3339(),
            card.id.value.to_string(),
            collection,
        ],
    )?;
    Ok(changed > 0)
}

/// Returns false if there was nothing to delete.
pub fn delete(conn: &Connection, collection: &str, id: Id<Card>) -> RolodexResult<bool> {
    let changed = conn.execute(
        "DELETE FROM cards WHERE id = ?1 AND collection = ?2",
        params![id.value.to_string(), collection],
    )?;
    Ok(changed > 0)
}

pub fn find_by_id(conn: &Connection, collection: &str, id: Id<Card>) -> RolodexResult<Option<Card>> {
    let mut stmt = conn.prepare("SELECT id, document FROM cards WHERE id = ?1 AND collection = ?2")?;

    let result = stmt.query_row(params![id.value.to_string(), collection], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    });

    match result {
        Ok((id_str, document)) => Ok(Some(row_to_card(&id_str, &document)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All cards in a collection, in insertion order.
pub fn find_all(conn: &Connection, collection: &str) -> RolodexResult<Vec<Card>> {
    let mut stmt = conn.prepare("SELECT id, document FROM cards WHERE collection = ?1 ORDER BY rowid")?;

    let rows: Vec<(String, String)> = stmt
        .query_map(params![collection], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    rows.iter()
        .map(|(id_str, document)| row_to_card(id_str, document))
        .collect()
}

pub fn count(conn: &Connection, collection: &str) -> RolodexResult<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM cards WHERE collection = ?1",
        params![collection],
        |row| row.get(0),
    )?;
    Ok(n as usize)
}

/// Creation and last-update times of a card.
pub fn timestamps(
    conn: &Connection,
    collection: &str,
    id: Id<Card>,
) -> RolodexResult<Option<(DateTime<Utc>, DateTime<Utc>)>> {
    let result = conn.query_row(
        "SELECT created_at, updated_at FROM cards WHERE id = ?1 AND collection = ?2",
        params![id.value.to_string(), collection],
        |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
    );

    match result {
        Ok((created, updated)) => Ok(Some((parse_timestamp(&created)?, parse_timestamp(&updated)?))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_timestamp(s: &str) -> RolodexResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RolodexError::Other(format!("Invalid timestamp '{}': {}", s, e)))
}

fn row_to_card(id_str: &str, document: &str) -> RolodexResult<Card> {
    let id = Id::new(
        Uuid::parse_str(id_str).map_err(|e| RolodexError::Other(format!("Invalid UUID: {}", e)))?,
    );
    let contact: Contact = serde_json::from_str(document)?;
    Ok(Card { id, contact })
}
