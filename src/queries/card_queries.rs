//! Read side of the card collection. `all_cards` loads the collection; the
//! lookups work over a loaded snapshot so the CLI and the store agree on
//! what matches.

use rusqlite::Connection;

use crate::db::card_repo;
use crate::error::RolodexResult;
use crate::model::Card;

pub fn all_cards(conn: &Connection, collection: &str) -> RolodexResult<Vec<Card>> {
    card_repo::find_all(conn, collection)
}

/// Cards whose callsign equals `callsign`, ignoring case. Callsigns are not
/// unique, so this can return several cards.
pub fn find_by_callsign<'a>(cards: &'a [Card], callsign: &str) -> Vec<&'a Card> {
    let wanted = callsign.trim();
    cards.iter().filter(|c| c.callsign.eq_ignore_ascii_case(wanted)).collect()
}

/// Cards whose callsign or name contains `query`, ignoring case.
pub fn search<'a>(cards: &'a [Card], query: &str) -> Vec<&'a Card> {
    cards.iter().filter(|c| matches_query(c, query)).collect()
}

/// The search predicate shared by queries and the view pipeline.
pub fn matches_query(card: &Card, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    q.is_empty() || card.callsign.to_lowercase().contains(&q) || card.name.to_lowercase().contains(&q)
}
