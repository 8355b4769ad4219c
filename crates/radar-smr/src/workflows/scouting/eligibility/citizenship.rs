use super::super::domain::PlayerRecord;
use super::config::EligibilityRules;
use super::CitizenshipStatus;

/// Citizenship determination plus the residency total it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct CitizenshipInfo {
    pub status: CitizenshipStatus,
    pub notes: Vec<String>,
    pub target_residence_years: f64,
}

impl CitizenshipInfo {
    pub fn is_citizen(&self) -> bool {
        self.status == CitizenshipStatus::HasTargetCitizenship
    }
}

pub fn determine_citizenship_status(
    record: &PlayerRecord,
    rules: &EligibilityRules,
) -> CitizenshipInfo {
    let target = &rules.target_nation;
    let target_residence_years = record.residence_history.years_in(target);

    if record.holds_nationality(target) {
        return CitizenshipInfo {
            status: CitizenshipStatus::HasTargetCitizenship,
            notes: vec![format!("player declares {target} citizenship")],
            target_residence_years,
        };
    }

    let threshold = rules.citizenship_min_residence_years;
    let (status, note) = if target_residence_years >= threshold {
        (
            CitizenshipStatus::HasTargetCitizenship,
            format!(
                "player has resided in {target} for {target_residence_years:.1} years (threshold: {threshold:.1})"
            ),
        )
    } else if target_residence_years > 0.0 {
        (
            CitizenshipStatus::LacksTargetCitizenship,
            format!(
                "player has resided in {target} for {target_residence_years:.1} years, {:.1} short of the {threshold:.1}-year threshold",
                threshold - target_residence_years
            ),
        )
    } else {
        (
            CitizenshipStatus::LacksTargetCitizenship,
            format!("no documented residency in {target}"),
        )
    };

    CitizenshipInfo {
        status,
        notes: vec![note],
        target_residence_years,
    }
}
