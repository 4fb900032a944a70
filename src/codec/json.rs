use serde::Deserialize;

use crate::error::RolodexResult;
use crate::model::Contact;

/// The contact document exactly as it is stored.
pub fn encode(contact: &Contact) -> RolodexResult<String> {
    Ok(serde_json::to_string_pretty(contact)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Contact>),
    One(Contact),
}

/// Reads a single contact object or an array of them. A leading byte order
/// mark is ignored.
pub fn decode(text: &str) -> RolodexResult<Vec<Contact>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Ok(match serde_json::from_str::<OneOrMany>(text)? {
        OneOrMany::Many(contacts) => contacts,
        OneOrMany::One(contact) => vec![contact],
    })
}
