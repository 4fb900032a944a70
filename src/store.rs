//! Live card collection for one owner.
//!
//! `CardStore` keeps the last-fetched snapshot of the owner's collection and
//! pushes a fresh snapshot to every subscribed listener after each successful
//! write. Writes are applied in the order they arrive and the last one wins;
//! there is no conflict detection between an edit and a concurrent delete.

use std::fmt;

use rusqlite::Connection;
use tracing::{debug, error};

use crate::db;
use crate::error::RolodexResult;
use crate::model::{Card, Contact, Id};
use crate::ops::card_ops::{self, ImportStats};
use crate::queries::card_queries;

type Listener = Box<dyn FnMut(&[Card])>;

/// Handle returned by [`CardStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

pub struct CardStore {
    conn: Connection,
    collection: String,
    snapshot: Vec<Card>,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for CardStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardStore")
            .field("collection", &self.collection)
            .field("cards", &self.snapshot.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CardStore {
    /// Opens the owner's collection on an initialized connection and loads
    /// the first snapshot.
    pub fn open(conn: Connection, owner: &str) -> RolodexResult<Self> {
        let collection = db::collection_path(owner);
        let snapshot = card_queries::all_cards(&conn, &collection)?;
        debug!(collection = %collection, cards = snapshot.len(), "card store opened");
        Ok(Self {
            conn,
            collection,
            snapshot,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The cached snapshot, in storage order.
    pub fn cards(&self) -> &[Card] {
        &self.snapshot
    }

    pub fn get(&self, id: Id<Card>) -> Option<&Card> {
        self.snapshot.iter().find(|c| c.id == id)
    }

    /// Registers a listener. It is called once immediately with the current
    /// snapshot, then again after every write.
    pub fn subscribe(&mut self, mut listener: impl FnMut(&[Card]) + 'static) -> Subscription {
        let sub = Subscription(self.next_subscription);
        self.next_subscription += 1;
        listener(&self.snapshot);
        self.listeners.push((sub, Box::new(listener)));
        sub
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _)| *s != sub);
        self.listeners.len() != before
    }

    /// Re-reads the collection and notifies listeners.
    pub fn refresh(&mut self) -> RolodexResult<()> {
        self.snapshot = logged("refresh", card_queries::all_cards(&self.conn, &self.collection))?;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.snapshot);
        }
        Ok(())
    }

    pub fn add_card(&mut self, contact: Contact) -> RolodexResult<Card> {
        let card = logged("add", card_ops::create_card(&self.conn, &self.collection, contact))?;
        self.refresh()?;
        Ok(card)
    }

    pub fn edit_card(&mut self, id: Id<Card>, contact: Contact) -> RolodexResult<Card> {
        let card = logged("edit", card_ops::edit_card(&self.conn, &self.collection, id, contact))?;
        self.refresh()?;
        Ok(card)
    }

    pub fn delete_card(&mut self, id: Id<Card>) -> RolodexResult<()> {
        logged("delete", card_ops::delete_card(&self.conn, &self.collection, id))?;
        self.refresh()
    }

    pub fn set_star(&mut self, id: Id<Card>, star: bool) -> RolodexResult<Card> {
        let card = logged("star", card_ops::set_star(&self.conn, &self.collection, id, star))?;
        self.refresh()?;
        Ok(card)
    }

    pub fn import(&mut self, contacts: Vec<Contact>) -> RolodexResult<ImportStats> {
        let (_, stats) = logged("import", card_ops::import_cards(&self.conn, &self.collection, contacts))?;
        self.refresh()?;
        Ok(stats)
    }
}

fn logged<T>(operation: &str, result: RolodexResult<T>) -> RolodexResult<T> {
    result.map_err(|e| {
        error!(operation, error = %e, "card store operation failed");
        e
    })
}
