use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::domain::CountryCode;

/// A single residency interval reported for a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidenceEntry {
    pub country: CountryCode,
    pub years: f64,
}

impl ResidenceEntry {
    pub fn new(country: CountryCode, years: f64) -> Option<Self> {
        if years.is_finite() && years >= 0.0 {
            Some(Self { country, years })
        } else {
            None
        }
    }
}

/// Chronological residency intervals. Entries for the same country are additive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResidenceHistory(Vec<ResidenceEntry>);

impl ResidenceHistory {
    pub fn new(entries: Vec<ResidenceEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[ResidenceEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, entry: ResidenceEntry) {
        self.0.push(entry);
    }

    /// Total years across every entry recorded for `country`.
    pub fn years_in(&self, country: &CountryCode) -> f64 {
        self.0
            .iter()
            .filter(|entry| &entry.country == country)
            .map(|entry| entry.years)
            .sum()
    }

    /// Builds a history from an untyped payload.
    ///
    /// Accepts a native sequence or a JSON-encoded string of one. Unusable payloads yield an
    /// empty history and unusable entries are skipped; both are logged, neither fails.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::default(),
            Value::Array(items) => Self(items.iter().filter_map(parse_entry).collect()),
            Value::String(raw) => {
                if raw.trim().is_empty() {
                    return Self::default();
                }
                match serde_json::from_str::<Value>(&raw) {
                    Ok(parsed @ Value::Array(_)) => Self::from_value(parsed),
                    Ok(other) => {
                        warn!(value = %other, "residence history is not a sequence; using empty history");
                        Self::default()
                    }
                    Err(err) => {
                        warn!(error = %err, "unparsable residence history; using empty history");
                        Self::default()
                    }
                }
            }
            other => {
                warn!(value = %other, "residence history has unexpected shape; using empty history");
                Self::default()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ResidenceHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.map(ResidenceHistory::from_value).unwrap_or_default())
    }
}

fn parse_entry(item: &Value) -> Option<ResidenceEntry> {
    let country = item
        .get("country")
        .and_then(Value::as_str)
        .and_then(CountryCode::parse);
    let years = item.get("years").and_then(parse_years);

    match (country, years) {
        (Some(country), Some(years)) => {
            let entry = ResidenceEntry::new(country, years);
            if entry.is_none() {
                warn!(entry = %item, "skipping residence entry with negative or non-finite years");
            }
            entry
        }
        _ => {
            warn!(entry = %item, "skipping malformed residence entry");
            None
        }
    }
}

// Extraction output sometimes carries the year count as text.
fn parse_years(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}
