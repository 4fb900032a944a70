use crate::error::{RolodexError, RolodexResult};

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str, field: &str) -> RolodexResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err(RolodexError::BlankField {
            field: field.to_string(),
        })
    } else {
        Ok(trimmed)
    }
}

/// Validates a callsign and returns its canonical (trimmed, uppercase) form.
pub fn callsign(value: &str) -> RolodexResult<String> {
    non_blank(value, "callsign").map(|s| canonical_callsign(&s))
}

/// Uppercases and trims a callsign without rejecting blanks.
pub fn canonical_callsign(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Validates an optional number (None is valid, Some(n) must be finite).
pub fn optional_finite(value: Option<f64>, field: &str) -> RolodexResult<Option<f64>> {
    match value {
        Some(n) if !n.is_finite() => Err(RolodexError::NonFinite {
            field: field.to_string(),
        }),
        other => Ok(other),
    }
}

/// Trims an optional string, returning None if blank.
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Trims a website, dropping blanks and adding `https://` when no scheme is given.
pub fn website(value: Option<&str>) -> Option<String> {
    trim_optional(value).map(|url| {
        let lower = url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            url
        } else {
            format!("https://{}", url)
        }
    })
}
