use rusqlite::Connection;
use tracing::{debug, warn};

use crate::db::card_repo;
use crate::error::{RolodexError, RolodexResult};
use crate::model::{Card, CardKind, Contact, Id, RepeaterInfo};
use crate::validation::{self, optional_finite};

/// Normalizes a contact coming from a form or an import: canonical callsign,
/// trimmed text, `https://` websites and finite numbers only.
pub fn validate_contact(contact: Contact) -> RolodexResult<Contact> {
    let callsign = validation::callsign(&contact.callsign)?;
    let website = validation::website(contact.website.as_deref());

    let (name, kind) = match contact.kind {
        CardKind::Person => (validation::non_blank(&contact.name, "name")?, CardKind::Person),
        CardKind::Repeater(info) => {
            let info = RepeaterInfo {
                location: info.location.trim().to_string(),
                frequency: optional_finite(info.frequency, "frequency")?,
                offset: optional_finite(info.offset, "offset")?,
                tx_tone_mode: info.tx_tone_mode,
                tx_tone: optional_finite(info.tx_tone, "txTone")?,
                rx_tone_mode: info.rx_tone_mode,
                rx_tone: optional_finite(info.rx_tone, "rxTone")?,
            };
            (contact.name.trim().to_string(), CardKind::Repeater(info))
        }
    };

    Ok(Contact {
        callsign,
        name,
        star: contact.star,
        website,
        kind,
    })
}

pub fn create_card(conn: &Connection, collection: &str, contact: Contact) -> RolodexResult<Card> {
    let card = Card::create(validate_contact(contact)?);
    card_repo::insert(conn, collection, &card)?;
    debug!(id = %card.id, callsign = %card.callsign, "card created");
    Ok(card)
}

/// Replaces the stored document wholesale; fields missing from `contact` are gone afterwards.
pub fn edit_card(
    conn: &Connection,
    collection: &str,
    id: Id<Card>,
    contact: Contact,
) -> RolodexResult<Card> {
    let card = Card {
        id,
        contact: validate_contact(contact)?,
    };
    if !card_repo::replace(conn, collection, &card)? {
        return Err(not_found(id));
    }
    debug!(id = %card.id, callsign = %card.callsign, "card replaced");
    Ok(card)
}

pub fn delete_card(conn: &Connection, collection: &str, id: Id<Card>) -> RolodexResult<()> {
    if !card_repo::delete(conn, collection, id)? {
        return Err(not_found(id));
    }
    debug!(id = %id, "card deleted");
    Ok(())
}

pub fn set_star(conn: &Connection, collection: &str, id: Id<Card>, star: bool) -> RolodexResult<Card> {
    let card = card_repo::find_by_id(conn, collection, id)?.ok_or_else(|| not_found(id))?;
    let mut contact = card.contact;
    contact.star = star;
    edit_card(conn, collection, id, contact)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub imported: usize,
    pub skipped: usize,
}

/// Creates a card for every valid contact in one transaction. Contacts that
/// fail validation are logged and skipped rather than aborting the batch.
pub fn import_cards(
    conn: &Connection,
    collection: &str,
    contacts: Vec<Contact>,
) -> RolodexResult<(Vec<Card>, ImportStats)> {
    let tx = conn.unchecked_transaction()?;
    let mut stats = ImportStats::default();
    let mut cards = Vec::new();

    for contact in contacts {
        let callsign = contact.callsign.clone();
        match validate_contact(contact) {
            Ok(valid) => {
                let card = Card::create(valid);
                card_repo::insert(&tx, collection, &card)?;
                cards.push(card);
                stats.imported += 1;
            }
            Err(e) => {
                warn!(callsign = %callsign, error = %e, "skipping invalid contact");
                stats.skipped += 1;
            }
        }
    }

    tx.commit()?;
    Ok((cards, stats))
}

fn not_found(id: Id<Card>) -> RolodexError {
    RolodexError::NotFound {
        entity_type: "Card".into(),
        id: id.to_string(),
    }
}
