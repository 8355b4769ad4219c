use std::io::Write;

use serde::Serialize;

use super::repository::StoredPlayer;

/// Flat row layout for spreadsheet exports.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    name: &'a str,
    dob: Option<String>,
    club: Option<&'a str>,
    role: Option<&'a str>,
    nationality: Option<&'a str>,
    track: Option<&'static str>,
    score: Option<u8>,
    citizenship_status: Option<&'static str>,
    time_to_eligible_estimate: Option<f64>,
    nat_path_feasibility: Option<&'a str>,
    sources: String,
}

impl<'a> From<&'a StoredPlayer> for ExportRow<'a> {
    fn from(player: &'a StoredPlayer) -> Self {
        let profile = &player.profile;
        let assessment = player.assessment.as_ref();
        Self {
            id: &player.id.0,
            name: &profile.name,
            dob: profile.dob.map(|dob| dob.format("%Y-%m-%d").to_string()),
            club: profile.club.as_deref(),
            role: profile.role.as_deref(),
            nationality: profile.nationality.as_ref().map(|code| code.as_str()),
            track: assessment.and_then(|outcome| outcome.track.map(|track| track.label())),
            score: assessment.map(|outcome| outcome.score),
            citizenship_status: assessment.map(|outcome| outcome.citizenship_status.label()),
            time_to_eligible_estimate: assessment
                .and_then(|outcome| outcome.time_to_eligible_estimate),
            nat_path_feasibility: assessment
                .map(|outcome| outcome.nat_path_feasibility.as_str())
                .filter(|text| !text.is_empty()),
            sources: profile.sources.iter().collect::<Vec<_>>().join(" "),
        }
    }
}

const HEADER: [&str; 12] = [
    "id",
    "name",
    "dob",
    "club",
    "role",
    "nationality",
    "track",
    "score",
    "citizenship_status",
    "time_to_eligible_estimate",
    "nat_path_feasibility",
    "sources",
];

/// Writes players as CSV with a header row.
pub fn write_csv<W: Write>(players: &[StoredPlayer], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    // The serializer only emits headers alongside the first row.
    if players.is_empty() {
        csv_writer.write_record(HEADER)?;
    }
    for player in players {
        csv_writer.serialize(ExportRow::from(player))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(players: &[StoredPlayer]) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_csv(players, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| csv::Error::from(std::io::Error::other(err)))
}
