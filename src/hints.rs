//! Reading aids printed under a callsign: NATO phonetics or Morse code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RolodexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintMode {
    #[default]
    Morse,
    Nato,
    None,
}

impl HintMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HintMode::Morse => "morse",
            HintMode::Nato => "nato",
            HintMode::None => "none",
        }
    }

    /// Renders the hint line for a callsign, or None when hints are off.
    pub fn render(&self, callsign: &str) -> Option<String> {
        match self {
            HintMode::Morse => Some(morse(callsign)),
            HintMode::Nato => Some(nato(callsign)),
            HintMode::None => None,
        }
    }
}

impl fmt::Display for HintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HintMode {
    type Err = RolodexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morse" => Ok(HintMode::Morse),
            "nato" => Ok(HintMode::Nato),
            "none" | "off" => Ok(HintMode::None),
            other => Err(RolodexError::Other(format!("Unknown hint mode: {}", other))),
        }
    }
}

pub fn nato_word(c: char) -> Option<&'static str> {
    let word = match c.to_ascii_uppercase() {
        '0' => "Zero",
        '1' => "One",
        '2' => "Two",
        '3' => "Three",
        '4' => "Four",
        '5' => "Five",
        '6' => "Six",
        '7' => "Seven",
        '8' => "Eight",
        '9' => "Niner",
        'A' => "Alfa",
        'B' => "Bravo",
        'C' => "Charlie",
        'D' => "Delta",
        'E' => "Echo",
        'F' => "Foxtrot",
        'G' => "Golf",
        'H' => "Hotel",
        'I' => "India",
        'J' => "Juliett",
        'K' => "Kilo",
        'L' => "Lima",
        'M' => "Mike",
        'N' => "November",
        'O' => "Oscar",
        'P' => "Papa",
        'Q' => "Quebec",
        'R' => "Romeo",
        'S' => "Sierra",
        'T' => "Tango",
        'U' => "Uniform",
        'V' => "Victor",
        'W' => "Whiskey",
        'X' => "Xray",
        'Y' => "Yankee",
        'Z' => "Zulu",
        _ => return None,
    };
    Some(word)
}

pub fn morse_code(c: char) -> Option<&'static str> {
    let code = match c.to_ascii_uppercase() {
        'A' => ".-",
        'B' => "-...",
        'C' => "-.-.",
        'D' => "-..",
        'E' => ".",
        'F' => "..-.",
        'G' => "--.",
        'H' => "....",
        'I' => "..",
        'J' => ".---",
        'K' => "-.-",
        'L' => ".-..",
        'M' => "--",
        'N' => "-.",
        'O' => "---",
        'P' => ".--.",
        'Q' => "--.-",
        'R' => ".-.",
        'S' => "...",
        'T' => "-",
        'U' => "..-",
        'V' => "...-",
        'W' => ".--",
        'X' => "-..-",
        'Y' => "-.--",
        'Z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        '/' => "-..-.",
        _ => return None,
    };
    Some(code)
}

/// Phonetic spelling, e.g. "Whiskey One Alfa Whiskey". Unknown characters are skipped.
pub fn nato(callsign: &str) -> String {
    callsign.chars().filter_map(nato_word).collect::<Vec<_>>().join(" ")
}

/// Morse rendering with one space between characters.
pub fn morse(callsign: &str) -> String {
    callsign.chars().filter_map(morse_code).collect::<Vec<_>>().join(" ")
}
