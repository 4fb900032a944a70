use std::path::PathBuf;

use crate::config::Config;
use crate::error::{RolodexError, RolodexResult};
use crate::model::{Card, Id};
use crate::queries::card_queries;
use crate::store::CardStore;

pub struct CLIContext {
    pub store: CardStore,
    pub config: Config,
    pub config_path: PathBuf,
}

impl CLIContext {
    pub fn new(store: CardStore, config: Config, config_path: PathBuf) -> Self {
        Self {
            store,
            config,
            config_path,
        }
    }

    /// Resolve a card from an id, an exact callsign, or part of a callsign
    /// or name. Errors when nothing or more than one card matches.
    pub fn find_card(&self, query: &str) -> RolodexResult<Card> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RolodexError::BlankField { field: "card".into() });
        }

        if let Ok(id) = Id::<Card>::parse(query) {
            if let Some(card) = self.store.get(id) {
                return Ok(card.clone());
            }
        }

        let cards = self.store.cards();
        let exact = card_queries::find_by_callsign(cards, query);
        if exact.len() == 1 {
            return Ok(exact[0].clone());
        }

        let matches = if exact.is_empty() { card_queries::search(cards, query) } else { exact };

        match matches.len() {
            0 => Err(RolodexError::NotFound {
                entity_type: "Card".into(),
                id: query.to_string(),
            }),
            1 => Ok(matches[0].clone()),
            _ => {
                // Check for exact name match
                if let Some(named) = matches.iter().find(|c| c.name.eq_ignore_ascii_case(query)) {
                    return Ok((*named).clone());
                }
                let listed: Vec<String> = matches
                    .iter()
                    .map(|c| format!("  {} {} ({})", c.callsign, c.display_name(), c.id))
                    .collect();
                Err(RolodexError::Other(format!(
                    "Multiple matches found:\n{}\nPlease be more specific or use the id.",
                    listed.join("\n")
                )))
            }
        }
    }
}
