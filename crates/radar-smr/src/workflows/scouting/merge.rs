use super::domain::{is_placeholder, PlayerRecord};

/// Folds a freshly extracted record into the stored one.
///
/// Stored values win; the incoming record only fills gaps (missing or `N/D` values). Flags
/// are sticky once set, residence history is taken only when none is stored, and provenance
/// is unioned. Returns whether anything changed.
pub fn merge_profile(existing: &mut PlayerRecord, incoming: PlayerRecord) -> bool {
    let before = existing.clone();

    fill(&mut existing.dob, incoming.dob);
    fill(&mut existing.nationality, incoming.nationality);
    fill(&mut existing.birth_country, incoming.birth_country);
    fill_text(&mut existing.club, incoming.club);
    fill_text(&mut existing.role, incoming.role);

    existing.has_played_senior_national_team |= incoming.has_played_senior_national_team;
    existing.has_san_marino_ancestors |= incoming.has_san_marino_ancestors;

    if existing.residence_history.is_empty() && !incoming.residence_history.is_empty() {
        existing.residence_history = incoming.residence_history;
    }

    existing.sources.extend_from(&incoming.sources);

    *existing != before
}

/// Case- and whitespace-insensitive form of a player name, used for identity matching.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

fn fill_text(slot: &mut Option<String>, value: Option<String>) {
    let missing = slot.as_deref().map(is_placeholder).unwrap_or(true);
    if missing {
        if let Some(value) = value.filter(|text| !is_placeholder(text)) {
            *slot = Some(value);
        }
    }
}
