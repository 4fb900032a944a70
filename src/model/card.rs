use serde::{Deserialize, Serialize};

use super::contact::Contact;
use super::ids::Id;

/// A contact as persisted: the document plus the id the store assigned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: Id<Card>,
    #[serde(flatten)]
    pub contact: Contact,
}

impl Card {
    pub fn create(contact: Contact) -> Self {
        Self {
            id: Id::generate(),
            contact,
        }
    }
}

impl std::ops::Deref for Card {
    type Target = Contact;

    fn deref(&self) -> &Contact {
        &self.contact
    }
}
