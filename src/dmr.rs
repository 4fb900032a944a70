//! DMR id lookup against the radioid.net user database.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{RolodexError, RolodexResult};

const USER_API_URL: &str = "https://radioid.net/api/dmr/user/";
const DATABASE_VIEW_URL: &str = "https://radioid.net/database/view";
const TIMEOUT: Duration = Duration::from_secs(5);

/// A DMR radio id registered to a callsign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmrId(pub u64);

impl DmrId {
    /// Page for this id in the radioid.net database.
    pub fn database_url(&self) -> String {
        format!("{}?id={}", DATABASE_VIEW_URL, self.0)
    }
}

impl fmt::Display for DmrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    results: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: u64,
}

/// The first id in a user API response, or None when the callsign has none.
pub fn parse_response(body: &str) -> RolodexResult<Option<DmrId>> {
    let response: UserResponse = serde_json::from_str(body)?;
    if response.count == 0 {
        return Ok(None);
    }
    Ok(response.results.first().map(|r| DmrId(r.id)))
}

/// Looks up the DMR id registered to `callsign`.
pub fn lookup(callsign: &str) -> RolodexResult<Option<DmrId>> {
    let callsign = callsign.trim();
    if callsign.is_empty() {
        return Ok(None);
    }

    let body = ureq::get(USER_API_URL)
        .query("callsign", callsign)
        .timeout(TIMEOUT)
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => RolodexError::Lookup(format!("radioid.net returned HTTP {}", code)),
            ureq::Error::Transport(t) => RolodexError::Lookup(format!("could not reach radioid.net: {}", t)),
        })?
        .into_string()?;

    let id = parse_response(&body)?;
    debug!(callsign = %callsign, dmr_id = ?id, "DMR lookup");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_result_is_used() {
        let body = r#"{"count":2,"results":[
            {"callsign":"W1AW","city":"Newington","country":"United States","fname":"Hiram","id":3100001,"remarks":"","state":"Connecticut","surname":"Maxim"},
            {"callsign":"W1AW","id":3100002}
        ]}"#;
        assert_eq!(parse_response(body).unwrap(), Some(DmrId(3100001)));
    }

    #[test]
    fn no_results_is_none() {
        assert_eq!(parse_response(r#"{"count":0,"results":[]}"#).unwrap(), None);
        assert_eq!(parse_response("{}").unwrap(), None);
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_response("<html>busy</html>").is_err());
    }

    #[test]
    fn database_link() {
        assert_eq!(DmrId(3100001).database_url(), "https://radioid.net/database/view?id=3100001");
        assert_eq!(DmrId(3100001).to_string(), "3100001");
    }

    #[test]
    fn blank_callsign_skips_the_request() {
        assert_eq!(lookup("  ").unwrap(), None);
    }
}
