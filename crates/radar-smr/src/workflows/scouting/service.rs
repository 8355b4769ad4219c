use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{PlayerId, PlayerRecord};
use super::eligibility::{EligibilityAssessment, EligibilityEngine, EligibilityRules, Track};
use super::merge::merge_profile;
use super::repository::{PlayerStore, StoreError, StoredPlayer};
use super::source::{PlayerSource, SourceError};

/// Service composing the record store with the eligibility engine.
pub struct PlayerRadarService<S> {
    store: Arc<S>,
    engine: Arc<EligibilityEngine>,
}

static PLAYER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_player_id() -> PlayerId {
    let id = PLAYER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PlayerId(format!("player-{id:06}"))
}

impl<S> PlayerRadarService<S>
where
    S: PlayerStore + 'static,
{
    pub fn new(store: Arc<S>, rules: EligibilityRules) -> Self {
        Self {
            store,
            engine: Arc::new(EligibilityEngine::new(rules)),
        }
    }

    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    /// Store a freshly extracted player, merging into an existing entry with the same
    /// name and birth date.
    pub fn ingest(&self, extracted: PlayerRecord) -> Result<IngestOutcome, ServiceError> {
        match self
            .store
            .find_by_identity(&extracted.name, extracted.dob)?
        {
            Some(mut stored) => {
                if merge_profile(&mut stored.profile, extracted) {
                    self.store.update_profile(&stored.id, stored.profile)?;
                    Ok(IngestOutcome::Merged(stored.id))
                } else {
                    Ok(IngestOutcome::Unchanged(stored.id))
                }
            }
            None => {
                let stored = self.store.insert(StoredPlayer {
                    id: next_player_id(),
                    profile: extracted,
                    assessment: None,
                })?;
                Ok(IngestOutcome::Created(stored.id))
            }
        }
    }

    pub fn ingest_all(&self, extracted: Vec<PlayerRecord>) -> Result<IngestReport, ServiceError> {
        let mut report = IngestReport::default();
        for record in extracted {
            match self.ingest(record)? {
                IngestOutcome::Created(_) => report.created += 1,
                IngestOutcome::Merged(_) => report.merged += 1,
                IngestOutcome::Unchanged(_) => report.unchanged += 1,
            }
        }
        Ok(report)
    }

    /// Recompute and persist the assessment of every stored player.
    ///
    /// A failure to persist one player is recorded in the report and the run moves on; a
    /// failure to list players aborts the run.
    pub fn run_legal_assessment(
        &self,
        as_of: NaiveDate,
    ) -> Result<AssessmentRunReport, ServiceError> {
        let players = self.store.all()?;
        info!(players = players.len(), %as_of, "starting legal assessment");

        let mut report = AssessmentRunReport::default();
        for player in players {
            report.processed += 1;
            let assessment = self.engine.assess(&player.profile, as_of);

            match assessment.track {
                Some(Track::Now) => report.now += 1,
                Some(Track::WhatIf) => report.what_if += 1,
                None => report.incomplete += 1,
            }

            if let Err(err) = self.store.apply_assessment(&player.id, assessment) {
                warn!(player_id = %player.id, error = %err, "failed to persist assessment");
                report.failures.push(AssessmentFailure {
                    player_id: player.id,
                    error: err.to_string(),
                });
            }
        }

        info!(
            processed = report.processed,
            now = report.now,
            what_if = report.what_if,
            failures = report.failures.len(),
            "legal assessment completed"
        );
        Ok(report)
    }

    /// Pull extracted players from the pipeline, store them, then reassess everyone.
    pub fn run_full_refresh<P>(
        &self,
        source: &P,
        as_of: NaiveDate,
    ) -> Result<RefreshReport, ServiceError>
    where
        P: PlayerSource + ?Sized,
    {
        let extracted = source.extract()?;
        info!(extracted = extracted.len(), "ingesting extracted players");
        let ingest = self.ingest_all(extracted)?;
        let assessment = self.run_legal_assessment(as_of)?;
        Ok(RefreshReport { ingest, assessment })
    }

    /// Assess a single stored player and persist the result.
    pub fn assess(
        &self,
        id: &PlayerId,
        as_of: NaiveDate,
    ) -> Result<EligibilityAssessment, ServiceError> {
        let player = self.get(id)?;
        let assessment = self.engine.assess(&player.profile, as_of);
        self.store.apply_assessment(id, assessment.clone())?;
        Ok(assessment)
    }

    pub fn get(&self, id: &PlayerId) -> Result<StoredPlayer, ServiceError> {
        let player = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(player)
    }

    pub fn list(&self) -> Result<Vec<StoredPlayer>, ServiceError> {
        Ok(self.store.all()?)
    }
}

/// What happened to one extracted player during ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Created(PlayerId),
    Merged(PlayerId),
    Unchanged(PlayerId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub created: usize,
    pub merged: usize,
    pub unchanged: usize,
}

/// Summary of a batch legal assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssessmentRunReport {
    pub processed: usize,
    pub now: usize,
    pub what_if: usize,
    pub incomplete: usize,
    pub failures: Vec<AssessmentFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentFailure {
    pub player_id: PlayerId,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub ingest: IngestReport,
    pub assessment: AssessmentRunReport,
}

/// Error raised by the radar service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Source(#[from] SourceError),
}
