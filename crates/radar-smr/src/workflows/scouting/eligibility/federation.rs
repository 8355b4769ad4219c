use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{CountryCode, PlayerRecord};
use super::citizenship::CitizenshipInfo;
use super::config::EligibilityRules;
use super::AssessmentError;

/// Outcome of an ordered set of eligibility gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EligibilityGate {
    Passed(FederationBasis),
    Blocked(IneligibilityReason),
}

impl EligibilityGate {
    pub fn is_eligible(&self) -> bool {
        matches!(self, EligibilityGate::Passed(_))
    }

    pub fn summary(&self) -> String {
        match self {
            EligibilityGate::Passed(basis) => basis.summary(),
            EligibilityGate::Blocked(reason) => reason.summary(),
        }
    }
}

/// Federation ground under which a citizen may be called up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FederationBasis {
    Birth {
        country: CountryCode,
    },
    Ancestry {
        country: CountryCode,
    },
    Residency {
        country: CountryCode,
        post_majority_years: f64,
        required: f64,
    },
}

impl FederationBasis {
    pub fn summary(&self) -> String {
        match self {
            FederationBasis::Birth { country } => format!("player was born in {country}"),
            FederationBasis::Ancestry { country } => {
                format!("player has direct {country} ancestry")
            }
            FederationBasis::Residency {
                country,
                post_majority_years,
                required,
            } => format!(
                "player has resided in {country} for {post_majority_years:.1} years after coming of age (federation threshold: {required:.1})"
            ),
        }
    }
}

/// Enumerates why a player cannot be called up today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IneligibilityReason {
    SeniorCapForOtherNation {
        nationality: Option<CountryCode>,
    },
    LacksCitizenship {
        target: CountryCode,
    },
    FederationShortfall {
        post_majority_years: f64,
        required: f64,
    },
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            IneligibilityReason::SeniorCapForOtherNation { nationality } => match nationality {
                Some(code) => format!(
                    "player has already represented a senior national team while holding {code} nationality"
                ),
                None => "player has already represented a senior national team under another nationality"
                    .to_string(),
            },
            IneligibilityReason::LacksCitizenship { target } => {
                format!("player does not hold {target} citizenship")
            }
            IneligibilityReason::FederationShortfall {
                post_majority_years,
                required,
            } => format!(
                "player does not meet federation requirements (post-majority residency: {post_majority_years:.1} years, required: {required:.1})"
            ),
        }
    }
}

/// Hard gates for the NOW track, evaluated in order.
pub fn check_immediate_eligibility(
    record: &PlayerRecord,
    citizenship: &CitizenshipInfo,
    rules: &EligibilityRules,
    as_of: NaiveDate,
) -> Result<EligibilityGate, AssessmentError> {
    // A senior cap binds the player to that federation for good.
    if record.has_played_senior_national_team && !record.holds_nationality(&rules.target_nation) {
        return Ok(EligibilityGate::Blocked(
            IneligibilityReason::SeniorCapForOtherNation {
                nationality: record.nationality.clone(),
            },
        ));
    }

    if !citizenship.is_citizen() {
        return Ok(EligibilityGate::Blocked(
            IneligibilityReason::LacksCitizenship {
                target: rules.target_nation.clone(),
            },
        ));
    }

    check_federation_requirements(record, rules, as_of)
}

/// Birth, ancestry, or post-majority residency. Only meaningful for citizens.
pub fn check_federation_requirements(
    record: &PlayerRecord,
    rules: &EligibilityRules,
    as_of: NaiveDate,
) -> Result<EligibilityGate, AssessmentError> {
    let target = &rules.target_nation;

    if record.birth_country.as_ref() == Some(target) {
        return Ok(EligibilityGate::Passed(FederationBasis::Birth {
            country: target.clone(),
        }));
    }

    if record.has_san_marino_ancestors {
        return Ok(EligibilityGate::Passed(FederationBasis::Ancestry {
            country: target.clone(),
        }));
    }

    let post_majority_years = post_majority_residence_years(record, rules, as_of)?;
    let required = rules.federation_min_residence_years;

    if post_majority_years >= required {
        Ok(EligibilityGate::Passed(FederationBasis::Residency {
            country: target.clone(),
            post_majority_years,
            required,
        }))
    } else {
        Ok(EligibilityGate::Blocked(
            IneligibilityReason::FederationShortfall {
                post_majority_years,
                required,
            },
        ))
    }
}

/// Residency years in the target nation accrued after the age of majority.
///
/// Residence intervals carry no start dates, so the player's current age stands in for the
/// age at which each interval began: an adult gets every year counted, a minor none. An
/// unknown birth date counts as age zero.
pub(crate) fn post_majority_residence_years(
    record: &PlayerRecord,
    rules: &EligibilityRules,
    as_of: NaiveDate,
) -> Result<f64, AssessmentError> {
    let age = record.age_on(as_of)?.unwrap_or(0);
    if age >= rules.majority_age {
        Ok(record.residence_history.years_in(&rules.target_nation))
    } else {
        Ok(0.0)
    }
}
