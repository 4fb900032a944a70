use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::validation::canonical_callsign;

/// Sub-audible tone scheme used to open a repeater's squelch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToneMode {
    #[serde(rename = "CTCSS")]
    Ctcss,
    #[serde(rename = "DCS")]
    Dcs,
}

impl ToneMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToneMode::Ctcss => "CTCSS",
            ToneMode::Dcs => "DCS",
        }
    }

    /// Case-insensitive parse. Returns None for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CTCSS" => Some(ToneMode::Ctcss),
            "DCS" => Some(ToneMode::Dcs),
            _ => None,
        }
    }
}

impl fmt::Display for ToneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which variant of card a contact is, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CardType {
    Person,
    Repeater,
}

impl CardType {
    /// The wire name used in JSON documents and vCard `X-STATION-TYPE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Person => "person",
            CardType::Repeater => "repeater",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CardType::Person => "Person",
            CardType::Repeater => "Repeater",
        }
    }

    /// Parses a wire name. Unknown names fall back to `Person` with a warning.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "person" => CardType::Person,
            "repeater" => CardType::Repeater,
            other => {
                warn!(card_type = other, "unknown card type, treating as person");
                CardType::Person
            }
        }
    }
}

/// Radio data carried by a repeater card. Frequencies and offsets are in MHz,
/// tones in Hz (CTCSS) or as the DCS code number.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeaterInfo {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_tone_mode: Option<ToneMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_tone: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_tone_mode: Option<ToneMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_tone: Option<f64>,
}

impl RepeaterInfo {
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }
}

/// Variant-specific part of a contact, tagged by `cardType` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cardType", rename_all = "lowercase")]
pub enum CardKind {
    Person,
    Repeater(RepeaterInfo),
}

/// A rolodex card: an individual operator or a repeater station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawContact")]
pub struct Contact {
    pub callsign: String,
    pub name: String,
    pub star: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(flatten)]
    pub kind: CardKind,
}

impl Contact {
    pub fn person(callsign: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            callsign: callsign.into(),
            name: name.into(),
            star: false,
            website: None,
            kind: CardKind::Person,
        }
    }

    pub fn repeater(callsign: impl Into<String>, name: impl Into<String>, info: RepeaterInfo) -> Self {
        Self {
            callsign: callsign.into(),
            name: name.into(),
            star: false,
            website: None,
            kind: CardKind::Repeater(info),
        }
    }

    pub fn card_type(&self) -> CardType {
        match self.kind {
            CardKind::Person => CardType::Person,
            CardKind::Repeater(_) => CardType::Repeater,
        }
    }

    pub fn is_person(&self) -> bool {
        matches!(self.kind, CardKind::Person)
    }

    pub fn is_repeater(&self) -> bool {
        matches!(self.kind, CardKind::Repeater(_))
    }

    pub fn repeater_info(&self) -> Option<&RepeaterInfo> {
        match &self.kind {
            CardKind::Repeater(info) => Some(info),
            CardKind::Person => None,
        }
    }

    /// Repeater location, or `""` for people.
    pub fn location(&self) -> &str {
        self.repeater_info().map(|r| r.location.as_str()).unwrap_or("")
    }

    /// Repeater output frequency, if known.
    pub fn frequency(&self) -> Option<f64> {
        self.repeater_info().and_then(|r| r.frequency)
    }

    /// The label shown for this card: the name, or the callsign when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.callsign
        } else {
            &self.name
        }
    }
}

/// Permissive document shape accepted from storage and JSON imports.
/// Every field is optional; gaps are filled in `From<RawContact>`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawContact {
    card_type: Option<String>,
    callsign: Option<String>,
    name: Option<String>,
    star: Option<bool>,
    website: Option<String>,
    location: Option<String>,
    frequency: Option<f64>,
    offset: Option<f64>,
    tx_tone_mode: Option<String>,
    #[serde(alias = "toneUp")]
    tx_tone: Option<f64>,
    rx_tone_mode: Option<String>,
    #[serde(alias = "toneDown")]
    rx_tone: Option<f64>,
}

fn lenient_tone_mode(value: Option<String>, field: &str) -> Option<ToneMode> {
    let raw = value?;
    if raw.trim().is_empty() {
        return None;
    }
    let mode = ToneMode::parse(&raw);
    if mode.is_none() {
        warn!(field, value = %raw, "unknown tone mode, dropping");
    }
    mode
}

impl From<RawContact> for Contact {
    fn from(raw: RawContact) -> Self {
        let card_type = raw
            .card_type
            .as_deref()
            .map(CardType::parse_lenient)
            .unwrap_or(CardType::Person);

        let kind = match card_type {
            CardType::Person => CardKind::Person,
            CardType::Repeater => CardKind::Repeater(RepeaterInfo {
                location: raw.location.unwrap_or_default(),
                frequency: raw.frequency,
                offset: raw.offset,
                tx_tone_mode: lenient_tone_mode(raw.tx_tone_mode, "txToneMode"),
                tx_tone: raw.tx_tone,
                rx_tone_mode: lenient_tone_mode(raw.rx_tone_mode, "rxToneMode"),
                rx_tone: raw.rx_tone,
            }),
        };

        Contact {
            callsign: canonical_callsign(raw.callsign.as_deref().unwrap_or_default()),
            name: raw.name.unwrap_or_default(),
            star: raw.star.unwrap_or(false),
            website: raw.website.filter(|w| !w.trim().is_empty()),
            kind,
        }
    }
}
