use crate::infra::InMemoryPlayerStore;
use chrono::{Local, NaiveDate};
use clap::Args;
use radar_smr::config::AppConfig;
use radar_smr::error::AppError;
use radar_smr::telemetry;
use radar_smr::workflows::scouting::export::write_csv;
use radar_smr::workflows::scouting::{
    JsonFilePlayerSource, PlayerRadarService, RefreshReport, StoredPlayer, Track,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Extracted players (JSON array or {"players": [...]})
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Evaluation date for age calculations (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Also write every assessed player to this CSV file
    #[arg(long)]
    pub(crate) export_csv: Option<PathBuf>,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        input,
        today,
        export_csv,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let store = Arc::new(InMemoryPlayerStore::default());
    let service = PlayerRadarService::new(store, config.eligibility);

    let report = service.run_full_refresh(&JsonFilePlayerSource::new(&input), today)?;
    let players = service.list()?;

    print!("{}", render_shortlist(&players, &report, today));

    if let Some(path) = export_csv {
        let file = File::create(&path)?;
        write_csv(&players, BufWriter::new(file))?;
        println!("\nExported {} players to {}", players.len(), path.display());
    }

    Ok(())
}

pub(crate) fn render_shortlist(
    players: &[StoredPlayer],
    report: &RefreshReport,
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Eligibility assessment as of {today}\n"));
    out.push_str(&format!(
        "- {} players ({} new, {} merged, {} unchanged)\n",
        report.assessment.processed,
        report.ingest.created,
        report.ingest.merged,
        report.ingest.unchanged
    ));
    out.push_str(&format!(
        "- NOW: {} | WHAT_IF: {} | incomplete: {}\n",
        report.assessment.now, report.assessment.what_if, report.assessment.incomplete
    ));
    for failure in &report.assessment.failures {
        out.push_str(&format!(
            "- not saved: {} ({})\n",
            failure.player_id, failure.error
        ));
    }

    let mut ranked: Vec<&StoredPlayer> = players.iter().collect();
    ranked.sort_by_key(|player| {
        let assessment = player.assessment.as_ref();
        (
            assessment.and_then(|outcome| outcome.track) != Some(Track::Now),
            std::cmp::Reverse(assessment.map(|outcome| outcome.score).unwrap_or(0)),
        )
    });

    out.push_str("\nShortlist\n");
    for player in ranked {
        let Some(outcome) = player.assessment.as_ref() else {
            out.push_str(&format!("  - {}: not assessed\n", player.profile.name));
            continue;
        };
        let track = outcome.track.map(Track::label).unwrap_or("INCOMPLETE");
        out.push_str(&format!(
            "  - [{track}] {} (score {}, {})\n",
            player.profile.name,
            outcome.score,
            outcome.citizenship_status.label()
        ));
        if !outcome.rationale.is_empty() {
            out.push_str(&format!("      {}\n", outcome.rationale));
        }
        if let Some(years) = outcome.time_to_eligible_estimate.filter(|years| *years > 0.0) {
            out.push_str(&format!("      ~{years:.1} years to eligibility\n"));
        }
    }

    out
}
