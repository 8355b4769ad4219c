//! Scouting workflow: ingest extracted player facts, assess national-team eligibility, and
//! expose the results.

pub mod domain;
pub mod eligibility;
pub mod export;
pub mod merge;
pub mod repository;
pub mod residence;
pub mod router;
pub mod service;
pub mod source;

#[cfg(test)]
mod tests;

pub use domain::{AgeError, CountryCode, PlayerId, PlayerRecord, SourceSet};
pub use eligibility::{
    CitizenshipStatus, EligibilityAssessment, EligibilityEngine, EligibilityRules, Track,
};
pub use repository::{PlayerStore, PlayerSummaryView, StoreError, StoredPlayer};
pub use residence::{ResidenceEntry, ResidenceHistory};
pub use router::{player_router, RadarState};
pub use service::{
    AssessmentFailure, AssessmentRunReport, IngestOutcome, IngestReport, PlayerRadarService,
    RefreshReport, ServiceError,
};
pub use source::{JsonFilePlayerSource, PlayerSource, SourceError};
