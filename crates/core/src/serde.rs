//! Serde helper functions for backend payloads.
//!
//! The backend and the geocoding service are loose about their JSON: optional
//! text fields arrive as empty strings and coordinates arrive either as
//! numbers or as decimal strings.

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

/// Deserialize an f64 that may be encoded as a JSON number or a decimal string.
pub fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Deserialize a timestamp into epoch milliseconds.
///
/// Accepts a number, a numeric string or an RFC 3339 date string.
pub fn deserialize_timestamp_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n as i64),
        NumberOrString::String(s) => {
            let s = s.trim();
            if let Ok(millis) = s.parse::<f64>() {
                return Ok(millis as i64);
            }
            chrono::DateTime::parse_from_rfc3339(s)
                .map(|date| date.timestamp_millis())
                .map_err(serde::de::Error::custom)
        }
    }
}
