mod citizenship;
mod config;
mod federation;
mod naturalization;
mod potential;

pub use citizenship::{determine_citizenship_status, CitizenshipInfo};
pub use config::EligibilityRules;
pub use federation::{
    check_federation_requirements, check_immediate_eligibility, EligibilityGate, FederationBasis,
    IneligibilityReason,
};
pub use naturalization::{analyze_naturalization_feasibility, NaturalizationFeasibility};
pub use potential::{
    check_potential_eligibility, PotentialEligibility, ScoreComponent, ScoreFactor,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{AgeError, PlayerRecord};

/// Eligibility track assigned to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Track {
    #[serde(rename = "NOW")]
    Now,
    #[serde(rename = "WHAT_IF")]
    WhatIf,
}

impl Track {
    pub const fn label(self) -> &'static str {
        match self {
            Track::Now => "NOW",
            Track::WhatIf => "WHAT_IF",
        }
    }
}

/// Citizenship of the target nation as far as the record shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitizenshipStatus {
    HasTargetCitizenship,
    LacksTargetCitizenship,
    #[default]
    Unknown,
}

impl CitizenshipStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CitizenshipStatus::HasTargetCitizenship => "has_target_citizenship",
            CitizenshipStatus::LacksTargetCitizenship => "lacks_target_citizenship",
            CitizenshipStatus::Unknown => "unknown",
        }
    }
}

/// Derived legal assessment written back onto a stored player.
///
/// `track` stays `None` only when the assessment failed before a track could be chosen; the
/// failure is then the last entry of `legal_notes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityAssessment {
    pub track: Option<Track>,
    pub citizenship_status: CitizenshipStatus,
    pub score: u8,
    pub rationale: String,
    pub legal_notes: Vec<String>,
    pub nat_path_feasibility: String,
    pub time_to_eligible_estimate: Option<f64>,
}

/// Unexpected failure while assessing a single record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentError {
    #[error("cannot compute age: {0}")]
    Age(#[from] AgeError),
}

/// Stateless evaluator applying the federation and citizenship rules to a record.
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    rules: EligibilityRules,
}

impl EligibilityEngine {
    pub fn new(rules: EligibilityRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &EligibilityRules {
        &self.rules
    }

    /// Recomputes the full assessment for `record` as of `as_of`.
    ///
    /// Never fails: a computation error is appended to `legal_notes` and whatever was
    /// determined before it is returned.
    pub fn assess(&self, record: &PlayerRecord, as_of: NaiveDate) -> EligibilityAssessment {
        let mut assessment = EligibilityAssessment::default();

        if let Err(err) = self.assess_into(record, as_of, &mut assessment) {
            warn!(player = %record.name, error = %err, "legal assessment incomplete");
            assessment
                .legal_notes
                .push(format!("legal assessment failed: {err}"));
        }

        debug!(
            player = %record.name,
            track = assessment.track.map(Track::label).unwrap_or("none"),
            score = assessment.score,
            "player assessed"
        );
        assessment
    }

    fn assess_into(
        &self,
        record: &PlayerRecord,
        as_of: NaiveDate,
        assessment: &mut EligibilityAssessment,
    ) -> Result<(), AssessmentError> {
        let citizenship = determine_citizenship_status(record, &self.rules);
        assessment.citizenship_status = citizenship.status;
        assessment.legal_notes.extend(citizenship.notes.iter().cloned());

        let gate = check_immediate_eligibility(record, &citizenship, &self.rules, as_of)?;
        if let EligibilityGate::Passed(basis) = &gate {
            assessment.track = Some(Track::Now);
            assessment.score = 100;
            assessment.rationale = basis.summary();
            assessment
                .legal_notes
                .push("player can be called up immediately under federation rules".to_string());
            return Ok(());
        }
        assessment.legal_notes.push(gate.summary());

        let potential = check_potential_eligibility(record, &citizenship, &self.rules, as_of)?;
        assessment.track = Some(Track::WhatIf);
        assessment.score = potential.score;
        assessment.rationale = potential.reason;
        assessment.nat_path_feasibility = potential.feasibility;
        assessment.time_to_eligible_estimate = potential.time_estimate;
        assessment.legal_notes.push(if potential.feasible {
            "naturalization path potentially feasible".to_string()
        } else {
            "naturalization path not feasible or highly complex".to_string()
        });

        Ok(())
    }
}
