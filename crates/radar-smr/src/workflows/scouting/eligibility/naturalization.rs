use serde::{Deserialize, Serialize};

use super::super::domain::PlayerRecord;
use super::citizenship::CitizenshipInfo;
use super::config::EligibilityRules;

/// Estimate of how far a player is from naturalizing in the target nation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaturalizationFeasibility {
    pub feasible: bool,
    pub explanation: String,
    pub time_estimate: Option<f64>,
}

/// Years still needed assume uninterrupted residence from today onwards.
pub fn analyze_naturalization_feasibility(
    record: &PlayerRecord,
    citizenship: &CitizenshipInfo,
    rules: &EligibilityRules,
) -> NaturalizationFeasibility {
    let target = &rules.target_nation;
    let years_needed =
        (rules.citizenship_min_residence_years - citizenship.target_residence_years).max(0.0);
    let within_horizon = years_needed <= rules.naturalization_horizon_years;

    let conflicting_nationality = record
        .nationality
        .as_ref()
        .filter(|code| *code != target);
    let requires_renunciation = !rules.allow_dual_citizenship && conflicting_nationality.is_some();

    let residency_clause = if years_needed > 0.0 {
        format!(
            "{years_needed:.1} more years of continuous residence in {target} required for naturalization"
        )
    } else {
        format!("residency requirement for {target} naturalization already met")
    };

    let policy_clause = match (rules.allow_dual_citizenship, conflicting_nationality) {
        (true, _) => format!("{target} allows dual citizenship"),
        (false, Some(code)) => format!(
            "{target} does not allow dual citizenship, so the player would have to renounce {code} citizenship"
        ),
        (false, None) => format!(
            "{target} does not allow dual citizenship; no other citizenship is on record"
        ),
    };

    let horizon_clause = if within_horizon {
        format!(
            "within the {:.1}-year planning horizon",
            rules.naturalization_horizon_years
        )
    } else {
        format!(
            "beyond the {:.1}-year planning horizon",
            rules.naturalization_horizon_years
        )
    };

    NaturalizationFeasibility {
        feasible: within_horizon && !requires_renunciation,
        explanation: format!("{residency_clause} ({horizon_clause}); {policy_clause}"),
        time_estimate: Some(years_needed),
    }
}
