use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RolodexError;
use crate::model::Card;
use crate::queries::card_queries::matches_query;
use crate::sorts::Sort;

/// How the card list is laid out. Section tags only appear in `Column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    Column,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::Column => "column",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = RolodexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "column" => Ok(ViewMode::Column),
            other => Err(RolodexError::Other(format!("Unknown view: {}", other))),
        }
    }
}

/// One visible card and the section label that starts at it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub card: &'a Card,
    pub tag: Option<String>,
}

/// Filters, orders, searches and tags a snapshot for display.
///
/// Tags are computed over the visible list after searching, so a section
/// header is never attached to a hidden card.
pub fn arrange<'a>(cards: &'a [Card], sort: &Sort, query: Option<&str>, view: ViewMode) -> Vec<Row<'a>> {
    let mut visible: Vec<&Card> = cards.iter().filter(|c| sort.accepts(c)).collect();
    visible.sort_by(|a, b| (sort.compare)(a, b));

    if let Some(q) = query.filter(|q| !q.trim().is_empty()) {
        visible.retain(|c| matches_query(c, q));
    }

    visible
        .iter()
        .enumerate()
        .map(|(i, &card)| {
            let tag = match view {
                ViewMode::Column => {
                    let previous = i.checked_sub(1).map(|p| &visible[p].contact);
                    sort.tag_for(card, previous)
                }
                ViewMode::Grid => None,
            };
            Row { card, tag }
        })
        .collect()
}
