use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{CountryCode, PlayerId, PlayerRecord};
use super::eligibility::{CitizenshipStatus, EligibilityAssessment, Track};

/// Repository record pairing the extracted facts with the derived assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlayer {
    pub id: PlayerId,
    pub profile: PlayerRecord,
    pub assessment: Option<EligibilityAssessment>,
}

impl StoredPlayer {
    pub fn summary_view(&self) -> PlayerSummaryView {
        let assessment = self.assessment.as_ref();
        PlayerSummaryView {
            id: self.id.clone(),
            name: self.profile.name.clone(),
            dob: self.profile.dob,
            club: self.profile.club.clone(),
            nationality: self.profile.nationality.clone(),
            track: assessment.and_then(|outcome| outcome.track),
            score: assessment.map(|outcome| outcome.score),
            citizenship_status: assessment
                .map(|outcome| outcome.citizenship_status)
                .unwrap_or_default(),
            rationale: assessment
                .map(|outcome| outcome.rationale.clone())
                .unwrap_or_else(|| "pending assessment".to_string()),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait PlayerStore: Send + Sync {
    fn insert(&self, player: StoredPlayer) -> Result<StoredPlayer, StoreError>;
    /// Replaces the extracted facts, leaving any assessment in place.
    fn update_profile(&self, id: &PlayerId, profile: PlayerRecord) -> Result<(), StoreError>;
    /// Replaces the assessment only; biographical fields are never touched.
    fn apply_assessment(
        &self,
        id: &PlayerId,
        assessment: EligibilityAssessment,
    ) -> Result<(), StoreError>;
    fn fetch(&self, id: &PlayerId) -> Result<Option<StoredPlayer>, StoreError>;
    fn find_by_identity(
        &self,
        name: &str,
        dob: Option<NaiveDate>,
    ) -> Result<Option<StoredPlayer>, StoreError>;
    fn all(&self) -> Result<Vec<StoredPlayer>, StoreError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Compact listing entry exposed over HTTP.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummaryView {
    pub id: PlayerId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<CountryCode>,
    pub track: Option<Track>,
    pub score: Option<u8>,
    pub citizenship_status: CitizenshipStatus,
    pub rationale: String,
}
