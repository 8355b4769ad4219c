use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::residence::ResidenceHistory;

/// Identifier wrapper for stored players.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upper-cased ISO country code (alpha-2 or alpha-3).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if (2..=3).contains(&trimmed.len()) && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Self(trimmed.to_ascii_uppercase()))
        } else {
            None
        }
    }

    // Only for codes written in source; user input goes through `parse`.
    pub(crate) fn from_static(code: &'static str) -> Self {
        Self(code.to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        CountryCode::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("'{raw}' is not an ISO country code")))
    }
}

/// Biographical facts about a player as extracted from public sources.
///
/// Every field except `name` may be missing. Deserialization never fails on a malformed
/// optional field; the value is dropped with a warning instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub dob: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_country")]
    pub nationality: Option<CountryCode>,
    #[serde(default, alias = "birthCountry", deserialize_with = "lenient_country")]
    pub birth_country: Option<CountryCode>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub club: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub role: Option<String>,
    #[serde(
        default,
        alias = "hasPlayedSeniorNationalTeam",
        deserialize_with = "lenient_flag"
    )]
    pub has_played_senior_national_team: bool,
    #[serde(
        default,
        alias = "hasSanMarinoAncestors",
        deserialize_with = "lenient_flag"
    )]
    pub has_san_marino_ancestors: bool,
    #[serde(default, alias = "residenceHistory")]
    pub residence_history: ResidenceHistory,
    #[serde(default)]
    pub sources: SourceSet,
}

impl PlayerRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dob: None,
            nationality: None,
            birth_country: None,
            club: None,
            role: None,
            has_played_senior_national_team: false,
            has_san_marino_ancestors: false,
            residence_history: ResidenceHistory::default(),
            sources: SourceSet::default(),
        }
    }

    /// Completed years of age on `as_of`, or `None` when the birth date is unknown.
    pub fn age_on(&self, as_of: NaiveDate) -> Result<Option<u32>, AgeError> {
        match self.dob {
            None => Ok(None),
            Some(dob) => as_of
                .years_since(dob)
                .map(Some)
                .ok_or(AgeError::BornAfter { dob, as_of }),
        }
    }

    pub fn holds_nationality(&self, code: &CountryCode) -> bool {
        self.nationality.as_ref() == Some(code)
    }
}

/// Raised when a birth date cannot produce an age for the evaluation date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgeError {
    #[error("date of birth {dob} is after evaluation date {as_of}")]
    BornAfter { dob: NaiveDate, as_of: NaiveDate },
}

/// Deduplicated provenance URLs for a player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceSet(BTreeSet<String>);

impl SourceSet {
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.0.insert(trimmed.to_string())
    }

    pub fn extend_from(&mut self, other: &SourceSet) {
        for url in &other.0 {
            self.0.insert(url.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SourceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SourceSet::default();
        for url in iter {
            set.insert(url);
        }
        set
    }
}

impl<'de> Deserialize<'de> for SourceSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.map(SourceSet::from_value).unwrap_or_default())
    }
}

impl SourceSet {
    /// Accepts a sequence of URLs, a JSON-encoded sequence, or a bare URL string.
    fn from_value(value: Value) -> Self {
        match value {
            Value::Null => SourceSet::default(),
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(url) => Some(url),
                    other => {
                        warn!(entry = %other, "skipping non-string source entry");
                        None
                    }
                })
                .collect(),
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(parsed @ Value::Array(_)) => SourceSet::from_value(parsed),
                _ => std::iter::once(raw).collect(),
            },
            other => {
                warn!(value = %other, "ignoring malformed sources field");
                SourceSet::default()
            }
        }
    }
}

const MISSING_PLACEHOLDER: &str = "N/D";

pub(crate) fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(MISSING_PLACEHOLDER)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(text)) if !is_placeholder(&text) => Some(text.trim().to_string()),
        _ => None,
    })
}

// Extraction output carries flags as booleans, 0/1, or yes/no text.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(number)) => match number.as_i64() {
            Some(0) => false,
            Some(1) => true,
            _ => {
                warn!(value = %number, "treating unrecognized numeric flag as false");
                false
            }
        },
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" => false,
            _ if is_placeholder(&text) => false,
            _ => {
                warn!(value = %text, "treating unrecognized flag text as false");
                false
            }
        },
        Some(other) => {
            warn!(value = %other, "treating non-scalar flag as false");
            false
        }
    })
}

fn lenient_country<'de, D>(deserializer: D) -> Result<Option<CountryCode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if is_placeholder(&text) => None,
        Some(Value::String(text)) => {
            let parsed = CountryCode::parse(&text);
            if parsed.is_none() {
                warn!(value = %text, "dropping unrecognized country code");
            }
            parsed
        }
        Some(other) => {
            warn!(value = %other, "dropping non-string country code");
            None
        }
    })
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if is_placeholder(&text) => None,
        Some(Value::String(text)) => {
            let parsed = parse_date(&text);
            if parsed.is_none() {
                warn!(value = %text, "dropping unparsable date of birth");
            }
            parsed
        }
        Some(other) => {
            warn!(value = %other, "dropping non-string date of birth");
            None
        }
    })
}

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}
