use super::common::*;
use crate::workflows::scouting::domain::{PlayerRecord, SourceSet};
use crate::workflows::scouting::merge::{merge_profile, normalize_name};
use crate::workflows::scouting::service::IngestOutcome;
use crate::workflows::scouting::source::parse_players;

#[test]
fn merge_fills_gaps_without_overwriting_known_facts() {
    let mut stored = player("Marco Rossi", Some("ITA"));
    stored.club = Some("N/D".to_string());
    stored.role = Some("Defender".to_string());
    stored.sources = ["https://example.org/a"].into_iter().collect();

    let mut incoming = player("Marco Rossi", Some("SMR"));
    incoming.dob = Some(born_years_ago(24));
    incoming.club = Some("Tre Fiori".to_string());
    incoming.role = Some("Midfielder".to_string());
    incoming.has_san_marino_ancestors = true;
    incoming.residence_history = residence(&[("SMR", 6.0)]);
    incoming.sources = ["https://example.org/b", "https://example.org/a"]
        .into_iter()
        .collect();

    assert!(merge_profile(&mut stored, incoming));

    assert_eq!(stored.nationality, Some(code("ITA")));
    assert_eq!(stored.dob, Some(born_years_ago(24)));
    assert_eq!(stored.club.as_deref(), Some("Tre Fiori"));
    assert_eq!(stored.role.as_deref(), Some("Defender"));
    assert!(stored.has_san_marino_ancestors);
    assert_eq!(stored.residence_history.years_in(&code("SMR")), 6.0);
    assert_eq!(stored.sources.len(), 2);
}

#[test]
fn merge_keeps_stored_residence_history_and_sticky_flags() {
    let mut stored = resident_italian(3.0, 22);
    stored.has_played_senior_national_team = true;

    let mut incoming = resident_italian(9.0, 22);
    incoming.has_played_senior_national_team = false;

    merge_profile(&mut stored, incoming);

    assert!(stored.has_played_senior_national_team);
    assert_eq!(stored.residence_history.years_in(&code("SMR")), 3.0);
}

#[test]
fn merge_reports_no_change_for_identical_record() {
    let mut stored = native_citizen();
    assert!(!merge_profile(&mut stored, native_citizen()));
}

#[test]
fn normalize_name_ignores_case_and_spacing() {
    assert_eq!(normalize_name("  Marco   ROSSI "), "marco rossi");
}

#[test]
fn ingest_deduplicates_on_name_and_birth_date() {
    let (service, store) = build_service();

    let first = service.ingest(resident_italian(3.0, 22)).expect("ingest");
    let IngestOutcome::Created(id) = first else {
        panic!("expected a new player, got {first:?}");
    };

    let mut again = resident_italian(3.0, 22);
    again.name = "marco  rossi".to_string();
    again.club = Some("Tre Penne".to_string());
    assert_eq!(
        service.ingest(again).expect("ingest"),
        IngestOutcome::Merged(id.clone())
    );
    assert_eq!(
        service.ingest(resident_italian(3.0, 22)).expect("ingest"),
        IngestOutcome::Unchanged(id.clone())
    );

    let namesake = resident_italian(3.0, 30);
    assert!(matches!(
        service.ingest(namesake).expect("ingest"),
        IngestOutcome::Created(_)
    ));

    assert_eq!(store.players.lock().expect("store").len(), 2);
    assert_eq!(
        store.snapshot(&id.0).profile.club.as_deref(),
        Some("Tre Penne")
    );
}

#[test]
fn ingest_all_counts_outcomes() {
    let (service, _store) = build_service();
    let report = service
        .ingest_all(vec![
            native_citizen(),
            native_citizen(),
            resident_italian(3.0, 22),
        ])
        .expect("ingest all");

    assert_eq!(report.created, 2);
    assert_eq!(report.merged, 0);
    assert_eq!(report.unchanged, 1);
}

#[test]
fn parse_players_skips_malformed_and_nameless_entries() {
    let payload = br#"{
        "players": [
            {"name": "Filippo Berardi", "dob": "1997-05-18", "nationality": "SMR", "birth_country": "SMR"},
            {"name": "N/D", "nationality": "ITA"},
            {"club": "Murata"},
            42,
            {"name": "  Dante Rossi  ", "dob": "2003-02-30", "nationality": "Italia"}
        ]
    }"#;

    let players = parse_players(&payload[..]).expect("payload parses");

    assert_eq!(players.len(), 2);
    assert_eq!(players[0].name, "Filippo Berardi");
    assert_eq!(players[0].birth_country, Some(code("SMR")));
    assert_eq!(players[1].name, "Dante Rossi");
    assert_eq!(players[1].dob, None);
    assert_eq!(players[1].nationality, None);
}

#[test]
fn parse_players_accepts_bare_array_and_camel_case_fields() {
    let payload = br#"[
        {
            "name": "Giacomo Zonzini",
            "birthCountry": "ita",
            "hasPlayedSeniorNationalTeam": true,
            "hasSanMarinoAncestors": true,
            "residenceHistory": "[{\"country\": \"SMR\", \"years\": \"4.5\"}, {\"country\": \"ITA\", \"years\": 10}]",
            "sources": "[\"https://example.org/zonzini\"]"
        }
    ]"#;

    let players = parse_players(&payload[..]).expect("payload parses");
    let record = &players[0];

    assert_eq!(record.birth_country, Some(code("ITA")));
    assert!(record.has_played_senior_national_team);
    assert!(record.has_san_marino_ancestors);
    assert_eq!(record.residence_history.years_in(&code("SMR")), 4.5);
    assert_eq!(record.residence_history.years_in(&code("ITA")), 10.0);
    assert_eq!(
        record.sources.iter().collect::<Vec<_>>(),
        vec!["https://example.org/zonzini"]
    );
}

#[test]
fn parse_players_rejects_non_json_payload() {
    assert!(parse_players(&b"players: none"[..]).is_err());
}

#[test]
fn sources_accept_single_url_and_drop_blanks() {
    let record: PlayerRecord = serde_json::from_value(serde_json::json!({
        "name": "Mattia Giardi",
        "sources": ["https://example.org/a", "  ", 7, "https://example.org/a "],
    }))
    .expect("record deserializes");
    assert_eq!(record.sources.len(), 1);

    let single: SourceSet =
        serde_json::from_value(serde_json::json!("https://example.org/b")).expect("sources");
    assert_eq!(single.iter().collect::<Vec<_>>(), vec!["https://example.org/b"]);

    let missing: SourceSet = serde_json::from_value(serde_json::Value::Null).expect("sources");
    assert!(missing.is_empty());
}

#[test]
fn loosely_typed_flags_keep_the_player() {
    let payload = br#"[
        {"name": "Null Flag", "nationality": "SMR", "birthCountry": "SMR", "hasPlayedSeniorNationalTeam": null},
        {"name": "String Flag", "nationality": "ITA", "hasSanMarinoAncestors": "true"},
        {"name": "Numeric Flag", "nationality": "ITA", "hasPlayedSeniorNationalTeam": 1, "hasSanMarinoAncestors": "no"},
        {"name": "Odd Flag", "nationality": "ITA", "hasPlayedSeniorNationalTeam": "sometimes", "hasSanMarinoAncestors": [true]},
        {"name": "Plain", "nationality": "ITA"}
    ]"#;

    let players = parse_players(&payload[..]).expect("payload parses");
    let names: Vec<&str> = players.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Null Flag", "String Flag", "Numeric Flag", "Odd Flag", "Plain"]
    );

    assert!(!players[0].has_played_senior_national_team);
    assert!(players[1].has_san_marino_ancestors);
    assert!(players[2].has_played_senior_national_team);
    assert!(!players[2].has_san_marino_ancestors);
    assert!(!players[3].has_played_senior_national_team);
    assert!(!players[3].has_san_marino_ancestors);

    let assessment = engine().assess(&players[0], as_of());
    assert_eq!(
        assessment.track,
        Some(crate::workflows::scouting::eligibility::Track::Now)
    );
}
