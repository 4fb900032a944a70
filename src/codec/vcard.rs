//! vCard 4.0 encoding with radio-specific `X-` properties.
//!
//! Repeater data travels in a single private property whose component order
//! is fixed:
//!
//! ```text
//! X-REPEATER-INFO:<frequency>;<offset>;<txToneMode>;<txTone>;<rxToneMode>;<rxTone>;
//! ```
//!
//! An absent value is an empty component. No other component order is read.

use tracing::{debug, warn};

use crate::model::{CardKind, CardType, Contact, RepeaterInfo, ToneMode};
use crate::validation::canonical_callsign;

const CRLF: &str = "\r\n";

/// Renders one contact as a vCard.
pub fn encode(contact: &Contact) -> String {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCARD".into(),
        "VERSION:4.0".into(),
        format!("X-CALLSIGN:{}", escape(&contact.callsign)),
        format!("X-STATION-TYPE:{}", contact.card_type().as_str()),
    ];

    match &contact.kind {
        CardKind::Repeater(info) => {
            let full_name = if contact.name.trim().is_empty() {
                &contact.callsign
            } else {
                &contact.name
            };
            lines.push(format!("FN:{}", escape(full_name)));
            lines.push(format!("ADR:;;;{};;;", escape(&info.location)));
            lines.push(format!("X-REPEATER-INFO:{}", repeater_line(info)));
        }
        CardKind::Person => {
            lines.push(format!("FN:{}", escape(&contact.name)));
            let (family, given, middle) = split_name(&contact.name);
            lines.push(format!(
                "N:{};{};{};;",
                escape(family),
                escape(given),
                escape(&middle)
            ));
        }
    }

    if let Some(url) = &contact.website {
        lines.push(format!("URL:{}", url));
    }

    lines.push("END:VCARD".into());
    let mut out = lines.join(CRLF);
    out.push_str(CRLF);
    out
}

/// Best-effort (family, given, middle) split: the last word is the family
/// name and the first is the given name. Wrong for many naming orders.
pub fn split_name(name: &str) -> (&str, &str, String) {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => ("", "", String::new()),
        [only] => (*only, "", String::new()),
        [given, middle @ .., family] => (*family, *given, middle.join(" ")),
    }
}

fn repeater_line(info: &RepeaterInfo) -> String {
    let number = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
    let mode = |m: Option<ToneMode>| m.map(|m| m.as_str().to_string()).unwrap_or_default();
    format!(
        "{};{};{};{};{};{};",
        number(info.frequency),
        number(info.offset),
        mode(info.tx_tone_mode),
        number(info.tx_tone),
        mode(info.rx_tone_mode),
        number(info.rx_tone),
    )
}

/// Decodes every vCard in `text`. Text without any `BEGIN:VCARD` is read as
/// a single card.
pub fn decode_all(text: &str) -> Vec<Contact> {
    let lines = unfold(text);
    let mut cards: Vec<Vec<&str>> = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in &lines {
        let upper = line.trim().to_ascii_uppercase();
        if upper == "BEGIN:VCARD" {
            current = Some(Vec::new());
        } else if upper == "END:VCARD" {
            if let Some(card) = current.take() {
                cards.push(card);
            }
        } else if let Some(card) = current.as_mut() {
            card.push(line.as_str());
        }
    }

    if let Some(unterminated) = current {
        debug!("vCard missing END:VCARD, keeping what was read");
        cards.push(unterminated);
    }
    if cards.is_empty() {
        cards.push(lines.iter().map(String::as_str).collect());
    }

    cards.into_iter().map(|card| decode_lines(&card)).collect()
}

/// Decodes the first vCard in `text`.
pub fn decode(text: &str) -> Contact {
    decode_all(text)
        .into_iter()
        .next()
        .unwrap_or_else(|| decode_lines(&[]))
}

#[derive(Default)]
struct Fields {
    full_name: Option<String>,
    structured_name: Option<String>,
    url: Option<String>,
    callsign: Option<String>,
    station_type: Option<String>,
    address: Option<String>,
    repeater_info: Option<String>,
}

fn decode_lines(lines: &[&str]) -> Contact {
    let mut fields = Fields::default();

    for line in lines {
        let Some((raw_key, value)) = line.split_once(':') else {
            continue;
        };
        let key = property_name(raw_key);
        let value = value.to_string();
        match key.as_str() {
            "FN" => fields.full_name = Some(value),
            "N" => fields.structured_name = Some(value),
            "URL" => fields.url = Some(value),
            "X-CALLSIGN" => fields.callsign = Some(value),
            "X-STATION-TYPE" => fields.station_type = Some(value),
            "ADR" => fields.address = Some(value),
            "X-REPEATER-INFO" => fields.repeater_info = Some(value),
            _ => {}
        }
    }

    let callsign = canonical_callsign(&unescape(fields.callsign.as_deref().unwrap_or("")));

    let card_type = match (&fields.station_type, &fields.repeater_info) {
        (_, Some(_)) => CardType::Repeater,
        (Some(t), None) => CardType::parse_lenient(t),
        (None, None) => CardType::Person,
    };

    let mut name = match (&fields.full_name, &fields.structured_name) {
        (Some(full), _) => unescape(full),
        (None, Some(n)) => name_from_components(n),
        (None, None) => String::new(),
    };

    let kind = match card_type {
        CardType::Person => CardKind::Person,
        CardType::Repeater => {
            // An unnamed repeater is written with its callsign as FN.
            if name == callsign {
                name.clear();
            }
            let mut info = fields
                .repeater_info
                .as_deref()
                .map(parse_repeater_info)
                .unwrap_or_default();
            info.location = fields.address.as_deref().map(locality).unwrap_or_default();
            CardKind::Repeater(info)
        }
    };

    Contact {
        callsign,
        name,
        star: false,
        website: fields.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()),
        kind,
    }
}

/// `item1.TEL;TYPE=cell` -> `TEL`
fn property_name(raw: &str) -> String {
    let name = raw.split(';').next().unwrap_or("");
    let name = name.rsplit('.').next().unwrap_or(name);
    name.trim().to_ascii_uppercase()
}

fn name_from_components(value: &str) -> String {
    let parts: Vec<String> = split_components(value).iter().map(|p| unescape(p)).collect();
    let family = parts.first().map(String::as_str).unwrap_or("");
    let given = parts.get(1).map(String::as_str).unwrap_or("");
    let middle = parts.get(2).map(String::as_str).unwrap_or("");
    [given, middle, family]
        .iter()
        .filter(|s| !s.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The locality component of an `ADR` value, or the whole value when it is
/// not structured.
fn locality(value: &str) -> String {
    let parts = split_components(value);
    if parts.len() > 1 {
        parts.get(3).map(|p| unescape(p)).unwrap_or_default()
    } else {
        unescape(value)
    }
}

fn parse_repeater_info(value: &str) -> RepeaterInfo {
    let parts = split_components(value);
    let component = |i: usize| parts.get(i).map(|p| p.trim()).filter(|p| !p.is_empty());

    let number = |i: usize, field: &str| {
        component(i).and_then(|raw| match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => {
                debug!(field, value = raw, "unparsable repeater number, dropping");
                None
            }
        })
    };
    let mode = |i: usize, field: &str| {
        component(i).and_then(|raw| {
            let parsed = ToneMode::parse(raw);
            if parsed.is_none() {
                warn!(field, value = raw, "unknown tone mode, dropping");
            }
            parsed
        })
    };

    RepeaterInfo {
        location: String::new(),
        frequency: number(0, "frequency"),
        offset: number(1, "offset"),
        tx_tone_mode: mode(2, "txToneMode"),
        tx_tone: number(3, "txTone"),
        rx_tone_mode: mode(4, "rxToneMode"),
        rx_tone: number(5, "rxTone"),
    }
}

/// Joins folded lines (continuations start with a space or tab) and strips CRs.
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(rest) = line.strip_prefix(|c: char| c == ' ' || c == '\t') {
            if let Some(last) = lines.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    lines
}

/// Splits on unescaped semicolons. Components are returned still escaped.
fn split_components(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ';' => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') | Some('N') => out.push('\n'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_name_uses_first_and_last_words() {
        assert_eq!(split_name("Hiram Percy Maxim"), ("Maxim", "Hiram", "Percy".to_string()));
        assert_eq!(split_name("Mary Ann Lee Smith"), ("Smith", "Mary", "Ann Lee".to_string()));
        assert_eq!(split_name("Cher"), ("Cher", "", String::new()));
        assert_eq!(split_name(""), ("", "", String::new()));
    }

    #[test]
    fn person_card_layout() {
        let mut c = Contact::person("W1AW", "Hiram Percy Maxim");
        c.website = Some("https://arrl.org".into());
        let text = encode(&c);
        assert!(text.starts_with("BEGIN:VCARD\r\nVERSION:4.0\r\n"));
        assert!(text.ends_with("END:VCARD\r\n"));
        assert!(text.contains("X-CALLSIGN:W1AW\r\n"));
        assert!(text.contains("FN:Hiram Percy Maxim\r\n"));
        assert!(text.contains("N:Maxim;Hiram;Percy;;\r\n"));
        assert!(text.contains("URL:https://arrl.org\r\n"));
        assert_eq!(text.matches("X-CALLSIGN").count(), 1);
    }

    #[test]
    fn repeater_line_has_fixed_order_and_empty_gaps() {
        let info = RepeaterInfo {
            location: "Newington".into(),
            frequency: Some(146.94),
            offset: Some(-0.6),
            tx_tone_mode: Some(ToneMode::Ctcss),
            tx_tone: Some(100.0),
            rx_tone_mode: None,
            rx_tone: None,
        };
        assert_eq!(repeater_line(&info), "146.94;-0.6;CTCSS;100;;;");
        assert_eq!(repeater_line(&RepeaterInfo::default()), ";;;;;;");
    }

    #[test]
    fn empty_component_is_absent_not_zero() {
        let info = parse_repeater_info(";0;;;DCS;23;");
        assert_eq!(info.frequency, None);
        assert_eq!(info.offset, Some(0.0));
        assert_eq!(info.tx_tone, None);
        assert_eq!(info.rx_tone_mode, Some(ToneMode::Dcs));
        assert_eq!(info.rx_tone, Some(23.0));
    }

    #[test]
    fn garbage_numbers_degrade_to_absent() {
        let info = parse_repeater_info("abc;NaN;XYZ;1e400;;");
        assert_eq!(info, RepeaterInfo::default());
    }

    #[test]
    fn n_is_used_only_without_fn() {
        let with_fn = decode("BEGIN:VCARD\nN:Maxim;Hiram;;;\nFN:H. P. Maxim\nEND:VCARD\n");
        assert_eq!(with_fn.name, "H. P. Maxim");

        let without_fn = decode("BEGIN:VCARD\nN:Maxim;Hiram;Percy;;\nEND:VCARD\n");
        assert_eq!(without_fn.name, "Hiram Percy Maxim");
    }

    #[test]
    fn url_keeps_colons_and_unknown_keys_are_ignored() {
        let c = decode("BEGIN:VCARD\nTEL;TYPE=cell:+1 555\nURL:https://qrz.com/db/W1AW\nX-CALLSIGN:w1aw\nEND:VCARD");
        assert_eq!(c.website.as_deref(), Some("https://qrz.com/db/W1AW"));
        assert_eq!(c.callsign, "W1AW");
        assert!(c.is_person());
    }

    #[test]
    fn parameters_and_groups_are_stripped_from_keys() {
        let c = decode("BEGIN:VCARD\r\nitem1.FN;CHARSET=UTF-8:Ann\r\nx-callsign:K1ABC\r\nEND:VCARD\r\n");
        assert_eq!(c.name, "Ann");
        assert_eq!(c.callsign, "K1ABC");
    }

    #[test]
    fn folded_lines_are_joined() {
        let c = decode("BEGIN:VCARD\r\nFN:Hiram Percy\r\n  Maxim\r\nEND:VCARD\r\n");
        assert_eq!(c.name, "Hiram Percy Maxim");
    }

    #[test]
    fn escaped_text_roundtrips() {
        let c = Contact::person("W1AW", "Smith, Jr; \\ the second");
        let back = decode(&encode(&c));
        assert_eq!(back.name, c.name);
    }

    #[test]
    fn repeater_info_alone_marks_a_repeater() {
        let c = decode("BEGIN:VCARD\nX-CALLSIGN:W1AW\nX-REPEATER-INFO:146.94;;;;;;\nEND:VCARD\n");
        assert!(c.is_repeater());
        assert_eq!(c.frequency(), Some(146.94));
    }

    #[test]
    fn unknown_station_type_is_person() {
        let c = decode("BEGIN:VCARD\nX-CALLSIGN:W1AW\nX-STATION-TYPE:beacon\nFN:Club\nEND:VCARD\n");
        assert!(c.is_person());
    }

    #[test]
    fn unnamed_repeater_keeps_empty_name() {
        let c = Contact::repeater("W1AW", "", RepeaterInfo::at("Newington, CT"));
        let text = encode(&c);
        assert!(text.contains("FN:W1AW\r\n"));
        assert!(text.contains("ADR:;;;Newington\\, CT;;;\r\n"));
        let back = decode(&text);
        assert_eq!(back.name, "");
        assert_eq!(back.location(), "Newington, CT");
    }

    #[test]
    fn plain_adr_value_is_the_location() {
        let c = decode("BEGIN:VCARD\nX-STATION-TYPE:repeater\nADR:Hartford\nEND:VCARD\n");
        assert_eq!(c.location(), "Hartford");
    }

    #[test]
    fn decode_all_reads_every_card() {
        let text = format!(
            "{}{}",
            encode(&Contact::person("K1ABC", "Ann Lee")),
            encode(&Contact::person("W1AW", "Hiram Maxim"))
        );
        let cards = decode_all(&text);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].callsign, "W1AW");
    }

    #[test]
    fn text_without_begin_is_one_card() {
        let cards = decode_all("FN:Ann\nX-CALLSIGN:K1ABC\n");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Ann");
    }
}
