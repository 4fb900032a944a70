//! Named orderings for the card list.
//!
//! Each [`Sort`] pairs a total-order comparator with an optional section-tag
//! generator and an optional filter. Tag functions only look at the current
//! and the previous card, so they must be fed a list already ordered by the
//! same entry's comparator, one card at a time.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::band::band_for;
use crate::error::RolodexError;
use crate::model::Contact;

/// Section label used for starred cards.
pub const STAR_TAG: &str = "★";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "SortSetting")]
pub enum SortKey {
    #[default]
    Starred,
    LastName,
    FirstName,
    Callsign,
    Type,
    Location,
    Frequency,
}

impl SortKey {
    pub fn sort(self) -> &'static Sort {
        sort_for(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Starred => "starred",
            SortKey::LastName => "last-name",
            SortKey::FirstName => "first-name",
            SortKey::Callsign => "callsign",
            SortKey::Type => "type",
            SortKey::Location => "location",
            SortKey::Frequency => "frequency",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = RolodexError;

    /// Accepts the kebab-case key, the display name in any case, or the
    /// position in [`SORTS`] (older settings stored the index).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if let Ok(index) = wanted.parse::<usize>() {
            if let Some(sort) = SORTS.get(index) {
                return Ok(sort.key);
            }
        }
        let folded: String = wanted
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        SORTS
            .iter()
            .find(|s| s.name.replace(' ', "").to_lowercase() == folded)
            .map(|s| s.key)
            .ok_or_else(|| RolodexError::Other(format!("Unknown sort: {}", s)))
    }
}

/// A stored sort setting: a key, a display name, or a legacy table index.
#[derive(Deserialize)]
#[serde(untagged)]
enum SortSetting {
    Index(u64),
    Name(String),
}

impl TryFrom<SortSetting> for SortKey {
    type Error = RolodexError;

    fn try_from(setting: SortSetting) -> Result<Self, Self::Error> {
        match setting {
            SortSetting::Index(index) => index.to_string().parse(),
            SortSetting::Name(name) => name.parse(),
        }
    }
}

type Compare = fn(&Contact, &Contact) -> Ordering;
type Tag = fn(&Contact, Option<&Contact>) -> Option<String>;
type Filter = fn(&Contact) -> bool;

pub struct Sort {
    pub key: SortKey,
    pub name: &'static str,
    pub group: &'static str,
    pub compare: Compare,
    pub tag: Option<Tag>,
    pub filter: Option<Filter>,
}

impl fmt::Debug for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sort")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("group", &self.group)
            .field("tagged", &self.tag.is_some())
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

impl Sort {
    /// Whether a contact belongs in a list ordered by this sort.
    pub fn accepts(&self, contact: &Contact) -> bool {
        self.filter.map_or(true, |f| f(contact))
    }

    /// Section label for `current`, or None when it continues the previous section.
    pub fn tag_for(&self, current: &Contact, previous: Option<&Contact>) -> Option<String> {
        self.tag.and_then(|t| t(current, previous))
    }
}

pub static SORTS: [Sort; 7] = [
    Sort {
        key: SortKey::Starred,
        name: "Starred",
        group: "General",
        compare: compare_starred,
        tag: Some(tag_starred),
        filter: None,
    },
    Sort {
        key: SortKey::LastName,
        name: "Last Name",
        group: "People",
        compare: compare_last_name,
        tag: Some(tag_last_name),
        filter: Some(Contact::is_person),
    },
    Sort {
        key: SortKey::FirstName,
        name: "First Name",
        group: "People",
        compare: compare_first_name,
        tag: Some(tag_first_name),
        filter: Some(Contact::is_person),
    },
    Sort {
        key: SortKey::Callsign,
        name: "Callsign",
        group: "General",
        compare: compare_callsign,
        tag: None,
        filter: None,
    },
    Sort {
        key: SortKey::Type,
        name: "Type",
        group: "General",
        compare: compare_type,
        tag: Some(tag_type),
        filter: None,
    },
    Sort {
        key: SortKey::Location,
        name: "Location",
        group: "Repeaters",
        compare: compare_location,
        tag: None,
        filter: None,
    },
    Sort {
        key: SortKey::Frequency,
        name: "Frequency",
        group: "Repeaters",
        compare: compare_frequency,
        tag: Some(tag_frequency),
        filter: Some(Contact::is_repeater),
    },
];

pub fn sort_for(key: SortKey) -> &'static Sort {
    SORTS
        .iter()
        .find(|s| s.key == key)
        .unwrap_or(&SORTS[0])
}

/// "Maxim, Hiram Percy" for "Hiram Percy Maxim".
pub fn last_name_first(name: &str) -> String {
    let mut parts: Vec<&str> = name.split_whitespace().collect();
    match parts.pop() {
        Some(last) => format!("{}, {}", last, parts.join(" ")),
        None => String::new(),
    }
}

/// Case-insensitive key that text is ordered and sectioned by.
fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

/// First character of the folded key, uppercased, or `#` for empty text.
/// Cards sorted by [`compare_text`] therefore never repeat a label.
fn initial(text: &str) -> String {
    fold(text)
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "#".to_string())
}

fn compare_text(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

fn compare_callsign(a: &Contact, b: &Contact) -> Ordering {
    compare_text(&a.callsign, &b.callsign)
}

fn compare_starred(a: &Contact, b: &Contact) -> Ordering {
    b.star.cmp(&a.star).then_with(|| compare_callsign(a, b))
}

fn compare_first_name(a: &Contact, b: &Contact) -> Ordering {
    compare_text(&a.name, &b.name).then_with(|| compare_callsign(a, b))
}

fn compare_last_name(a: &Contact, b: &Contact) -> Ordering {
    compare_text(&last_name_first(&a.name), &last_name_first(&b.name))
        .then_with(|| compare_first_name(a, b))
}

fn compare_type(a: &Contact, b: &Contact) -> Ordering {
    a.card_type()
        .cmp(&b.card_type())
        .then_with(|| compare_callsign(a, b))
}

fn compare_location(a: &Contact, b: &Contact) -> Ordering {
    compare_text(a.location(), b.location()).then_with(|| compare_callsign(a, b))
}

fn compare_frequency(a: &Contact, b: &Contact) -> Ordering {
    let fa = a.frequency().unwrap_or(0.0);
    let fb = b.frequency().unwrap_or(0.0);
    fa.total_cmp(&fb).then_with(|| compare_callsign(a, b))
}

/// Emits `current` unless it equals the previous card's key.
fn section(current: Option<String>, previous: Option<String>) -> Option<String> {
    match current {
        Some(key) if previous.as_deref() != Some(key.as_str()) => Some(key),
        _ => None,
    }
}

fn starred_section(c: &Contact) -> String {
    if c.star {
        STAR_TAG.to_string()
    } else {
        initial(&c.callsign)
    }
}

fn last_name_initial(c: &Contact) -> String {
    initial(c.name.split_whitespace().last().unwrap_or(""))
}

fn band_name(c: &Contact) -> Option<String> {
    band_for(c.frequency().unwrap_or(0.0)).map(|b| b.name.to_string())
}

fn tag_starred(current: &Contact, previous: Option<&Contact>) -> Option<String> {
    section(Some(starred_section(current)), previous.map(starred_section))
}

fn tag_last_name(current: &Contact, previous: Option<&Contact>) -> Option<String> {
    section(Some(last_name_initial(current)), previous.map(last_name_initial))
}

fn tag_first_name(current: &Contact, previous: Option<&Contact>) -> Option<String> {
    section(Some(initial(&current.name)), previous.map(|p| initial(&p.name)))
}

fn tag_type(current: &Contact, previous: Option<&Contact>) -> Option<String> {
    let key = |c: &Contact| c.card_type().display_name().to_string();
    section(Some(key(current)), previous.map(key))
}

fn tag_frequency(current: &Contact, previous: Option<&Contact>) -> Option<String> {
    section(band_name(current), previous.and_then(band_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RepeaterInfo;

    fn person(callsign: &str, name: &str) -> Contact {
        Contact::person(callsign, name)
    }

    fn repeater(callsign: &str, frequency: Option<f64>) -> Contact {
        let mut info = RepeaterInfo::at("");
        info.frequency = frequency;
        Contact::repeater(callsign, "", info)
    }

    fn tags(key: SortKey, contacts: &[Contact]) -> Vec<Option<String>> {
        let sort = sort_for(key);
        contacts
            .iter()
            .enumerate()
            .map(|(i, c)| sort.tag_for(c, i.checked_sub(1).map(|p| &contacts[p])))
            .collect()
    }

    #[test]
    fn table_covers_every_key_once() {
        for key in [
            SortKey::Starred,
            SortKey::LastName,
            SortKey::FirstName,
            SortKey::Callsign,
            SortKey::Type,
            SortKey::Location,
            SortKey::Frequency,
        ] {
            assert_eq!(SORTS.iter().filter(|s| s.key == key).count(), 1);
            assert_eq!(sort_for(key).key, key);
        }
    }

    #[test]
    fn parse_sort_names() {
        assert_eq!("last-name".parse::<SortKey>().unwrap(), SortKey::LastName);
        assert_eq!("Last Name".parse::<SortKey>().unwrap(), SortKey::LastName);
        assert_eq!("CALLSIGN".parse::<SortKey>().unwrap(), SortKey::Callsign);
        assert_eq!("1".parse::<SortKey>().unwrap(), SortKey::LastName);
        assert!("bogus".parse::<SortKey>().is_err());
    }

    #[test]
    fn sort_key_deserializes_from_index_or_name() {
        assert_eq!(serde_json::from_str::<SortKey>("2").unwrap(), SortKey::FirstName);
        assert_eq!(serde_json::from_str::<SortKey>("\"Last Name\"").unwrap(), SortKey::LastName);
        assert_eq!(serde_json::from_str::<SortKey>("\"frequency\"").unwrap(), SortKey::Frequency);
        assert!(serde_json::from_str::<SortKey>("7").is_err());
        assert_eq!(serde_json::to_string(&SortKey::LastName).unwrap(), "\"last-name\"");
    }

    #[test]
    fn last_name_labels_follow_the_ordering() {
        let mut list = vec![
            person("K1AAA", "Ann Ivy"),
            person("K1BBB", "Bea İnce"),
            person("K1CCC", "Cal Iris"),
            person("K1DDD", "Dee Jones"),
        ];
        list.sort_by(sort_for(SortKey::LastName).compare);
        let labels: Vec<String> = tags(SortKey::LastName, &list).into_iter().flatten().collect();
        assert_eq!(labels, vec!["I", "J"]);
    }

    #[test]
    fn last_name_first_moves_final_token() {
        assert_eq!(last_name_first("Hiram Percy Maxim"), "Maxim, Hiram Percy");
        assert_eq!(last_name_first("Cher"), "Cher, ");
        assert_eq!(last_name_first("   "), "");
    }

    #[test]
    fn starred_first_then_callsign() {
        let mut a = person("W1AW", "A");
        let b = person("K1ABC", "B");
        let mut c = person("N0CALL", "C");
        a.star = true;
        c.star = true;
        let mut list = vec![b.clone(), a.clone(), c.clone()];
        list.sort_by(sort_for(SortKey::Starred).compare);
        let calls: Vec<&str> = list.iter().map(|c| c.callsign.as_str()).collect();
        assert_eq!(calls, ["N0CALL", "W1AW", "K1ABC"]);
    }

    #[test]
    fn starred_tags_star_section_then_initials() {
        let mut a = person("N0CALL", "x");
        a.star = true;
        let list = vec![a, person("K1ABC", "y"), person("K2XYZ", "z"), person("W1AW", "w")];
        assert_eq!(
            tags(SortKey::Starred, &list),
            vec![Some("★".to_string()), Some("K".to_string()), None, Some("W".to_string())]
        );
    }

    #[test]
    fn last_name_ties_fall_back_to_first_name() {
        let a = person("K1A", "Zed Smith");
        let b = person("K1B", "Amy Smith");
        assert_eq!(compare_last_name(&a, &b), Ordering::Greater);
    }

    #[test]
    fn first_name_tag_uses_leading_letter() {
        let list = vec![person("A1", "alice"), person("A2", "Amy"), person("B1", "Bob")];
        assert_eq!(
            tags(SortKey::FirstName, &list),
            vec![Some("A".to_string()), None, Some("B".to_string())]
        );
    }

    #[test]
    fn type_sorts_people_before_repeaters() {
        let r = repeater("W1AW", None);
        let p = person("ZZ9", "Zed");
        assert_eq!(compare_type(&p, &r), Ordering::Less);
    }

    #[test]
    fn frequency_absent_sorts_as_zero() {
        let none = repeater("W1AW", None);
        let low = repeater("K1ABC", Some(0.5));
        assert_eq!(compare_frequency(&none, &low), Ordering::Less);
    }

    #[test]
    fn frequency_tags_by_band() {
        let list = vec![
            repeater("A", Some(146.52)),
            repeater("B", Some(147.0)),
            repeater("C", Some(446.0)),
        ];
        assert_eq!(
            tags(SortKey::Frequency, &list),
            vec![Some("2m".to_string()), None, Some("70cm".to_string())]
        );
    }

    #[test]
    fn frequency_outside_bands_has_no_tag() {
        let list = vec![repeater("A", Some(100.1)), repeater("B", None)];
        assert_eq!(tags(SortKey::Frequency, &list), vec![None, None]);
    }

    #[test]
    fn filters_restrict_by_card_type() {
        let p = person("W1AW", "Hiram");
        let r = repeater("W1AW", Some(146.94));
        assert!(sort_for(SortKey::LastName).accepts(&p));
        assert!(!sort_for(SortKey::LastName).accepts(&r));
        assert!(sort_for(SortKey::Frequency).accepts(&r));
        assert!(!sort_for(SortKey::Frequency).accepts(&p));
        assert!(sort_for(SortKey::Callsign).accepts(&p));
    }

    #[test]
    fn callsign_has_no_tag() {
        let list = vec![person("A1", "a"), person("B1", "b")];
        assert_eq!(tags(SortKey::Callsign, &list), vec![None, None]);
    }
}
