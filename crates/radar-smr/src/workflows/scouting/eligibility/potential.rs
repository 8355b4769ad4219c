use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::PlayerRecord;
use super::citizenship::CitizenshipInfo;
use super::config::EligibilityRules;
use super::naturalization::analyze_naturalization_feasibility;
use super::AssessmentError;

const CITIZEN_SCORE: u8 = 90;
const ADJACENCY_POINTS: i32 = 30;
const RESIDENCY_POINTS_PER_YEAR: f64 = 8.0;
const RESIDENCY_POINTS_CAP: f64 = 40.0;
const YOUNG_AGE_LIMIT: u32 = 25;
const YOUNG_POINTS: i32 = 15;
const PRIME_AGE_LIMIT: u32 = 30;
const PRIME_POINTS: i32 = 10;
const FEASIBILITY_POINTS: i32 = 25;
const NO_FACTOR_REASON: &str = "no positive factor identified";

/// Factors contributing to the WHAT_IF score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreFactor {
    TerritorialProximity,
    Residency,
    Age,
    NaturalizationFeasibility,
}

/// Discrete contribution to a WHAT_IF score, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: i32,
    pub notes: String,
}

/// Result of scoring a player who cannot be called up today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialEligibility {
    pub feasible: bool,
    pub score: u8,
    pub reason: String,
    pub feasibility: String,
    pub time_estimate: Option<f64>,
    pub components: Vec<ScoreComponent>,
}

pub fn check_potential_eligibility(
    record: &PlayerRecord,
    citizenship: &CitizenshipInfo,
    rules: &EligibilityRules,
    as_of: NaiveDate,
) -> Result<PotentialEligibility, AssessmentError> {
    let target = &rules.target_nation;

    if citizenship.is_citizen() {
        return Ok(PotentialEligibility {
            feasible: true,
            score: CITIZEN_SCORE,
            reason: format!("player already holds {target} citizenship"),
            feasibility: "already a citizen".to_string(),
            time_estimate: Some(0.0),
            components: Vec::new(),
        });
    }

    let naturalization = analyze_naturalization_feasibility(record, citizenship, rules);
    let components = score_components(record, citizenship, rules, as_of, naturalization.feasible)?;

    let total: i32 = components.iter().map(|component| component.points).sum();
    let score = total.clamp(0, 100) as u8;

    let reason = if components.is_empty() {
        NO_FACTOR_REASON.to_string()
    } else {
        components
            .iter()
            .map(|component| component.notes.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    };

    Ok(PotentialEligibility {
        feasible: naturalization.feasible,
        score,
        reason,
        feasibility: naturalization.explanation,
        time_estimate: naturalization.time_estimate,
        components,
    })
}

fn score_components(
    record: &PlayerRecord,
    citizenship: &CitizenshipInfo,
    rules: &EligibilityRules,
    as_of: NaiveDate,
    naturalization_feasible: bool,
) -> Result<Vec<ScoreComponent>, AssessmentError> {
    let target = &rules.target_nation;
    let mut components = Vec::new();

    if let Some(nationality) = record
        .nationality
        .as_ref()
        .filter(|code| rules.is_adjacent(code))
    {
        components.push(ScoreComponent {
            factor: ScoreFactor::TerritorialProximity,
            points: ADJACENCY_POINTS,
            notes: format!("territorial proximity: {nationality} borders {target}"),
        });
    }

    let residence_years = citizenship.target_residence_years;
    if residence_years > 0.0 {
        let points = (residence_years * RESIDENCY_POINTS_PER_YEAR).min(RESIDENCY_POINTS_CAP);
        components.push(ScoreComponent {
            factor: ScoreFactor::Residency,
            points: points.floor() as i32,
            notes: format!("residence in {target}: {residence_years:.1} years"),
        });
    }

    match record.age_on(as_of)? {
        Some(age) if age < YOUNG_AGE_LIMIT => components.push(ScoreComponent {
            factor: ScoreFactor::Age,
            points: YOUNG_POINTS,
            notes: format!("young player ({age}), ample time to naturalize"),
        }),
        Some(age) if age < PRIME_AGE_LIMIT => components.push(ScoreComponent {
            factor: ScoreFactor::Age,
            points: PRIME_POINTS,
            notes: format!("player in prime age ({age}), moderate time to naturalize"),
        }),
        Some(_) | None => {}
    }

    if naturalization_feasible {
        components.push(ScoreComponent {
            factor: ScoreFactor::NaturalizationFeasibility,
            points: FEASIBILITY_POINTS,
            notes: "naturalization path feasible within the planning horizon".to_string(),
        });
    }

    Ok(components)
}
