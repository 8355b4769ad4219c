use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::domain::{is_placeholder, PlayerRecord};

/// Upstream document pipeline yielding best-effort player facts.
pub trait PlayerSource: Send + Sync {
    fn extract(&self) -> Result<Vec<PlayerRecord>, SourceError>;
}

/// Failure raised by a document pipeline adapter.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read extracted players: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid extracted players payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("document pipeline unavailable: {0}")]
    Unavailable(String),
}

/// Reads extraction output that was exported to a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFilePlayerSource {
    path: std::path::PathBuf,
}

impl JsonFilePlayerSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PlayerSource for JsonFilePlayerSource {
    fn extract(&self) -> Result<Vec<PlayerRecord>, SourceError> {
        let file = std::fs::File::open(&self.path)?;
        parse_players(file)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlayersPayload {
    List(Vec<Value>),
    Wrapped { players: Vec<Value> },
}

/// Parses a JSON array of players, or an object with a `players` array.
///
/// Entries that are not players (no usable name, wrong shape) are skipped with a warning.
pub fn parse_players<R: Read>(reader: R) -> Result<Vec<PlayerRecord>, SourceError> {
    let payload: PlayersPayload = serde_json::from_reader(reader)?;
    let items = match payload {
        PlayersPayload::List(items) | PlayersPayload::Wrapped { players: items } => items,
    };

    let mut players = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<PlayerRecord>(item) {
            Ok(mut record) => {
                record.name = record.name.trim().to_string();
                if is_placeholder(&record.name) {
                    warn!(index, "skipping extracted player without a name");
                    continue;
                }
                players.push(record);
            }
            Err(err) => warn!(index, error = %err, "skipping malformed extracted player"),
        }
    }

    Ok(players)
}
