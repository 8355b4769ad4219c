use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use radar_smr::workflows::scouting::domain::parse_date as parse_evaluation_date;
use radar_smr::workflows::scouting::merge::normalize_name;
use radar_smr::workflows::scouting::{
    EligibilityAssessment, PlayerId, PlayerRecord, PlayerStore, StoreError, StoredPlayer,
};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local player store. Contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPlayerStore {
    players: Arc<Mutex<BTreeMap<PlayerId, StoredPlayer>>>,
}

impl InMemoryPlayerStore {
    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<PlayerId, StoredPlayer>>, StoreError> {
        self.players
            .lock()
            .map_err(|_| StoreError::Unavailable("player store mutex poisoned".to_string()))
    }
}

impl PlayerStore for InMemoryPlayerStore {
    fn insert(&self, player: StoredPlayer) -> Result<StoredPlayer, StoreError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&player.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(player.id.clone(), player.clone());
        Ok(player)
    }

    fn update_profile(&self, id: &PlayerId, profile: PlayerRecord) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let player = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        player.profile = profile;
        Ok(())
    }

    fn apply_assessment(
        &self,
        id: &PlayerId,
        assessment: EligibilityAssessment,
    ) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let player = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        player.assessment = Some(assessment);
        Ok(())
    }

    fn fetch(&self, id: &PlayerId) -> Result<Option<StoredPlayer>, StoreError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn find_by_identity(
        &self,
        name: &str,
        dob: Option<NaiveDate>,
    ) -> Result<Option<StoredPlayer>, StoreError> {
        let wanted = normalize_name(name);
        Ok(self
            .lock()?
            .values()
            .find(|player| {
                player.profile.dob == dob && normalize_name(&player.profile.name) == wanted
            })
            .cloned())
    }

    fn all(&self) -> Result<Vec<StoredPlayer>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_evaluation_date(raw).ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_lookup_ignores_name_formatting() {
        let store = InMemoryPlayerStore::default();
        let dob = NaiveDate::from_ymd_opt(2001, 3, 2);
        let mut profile = PlayerRecord::named("Marco Rossi");
        profile.dob = dob;
        store
            .insert(StoredPlayer {
                id: PlayerId("player-1".to_string()),
                profile,
                assessment: None,
            })
            .expect("insert");

        let found = store
            .find_by_identity(" marco  ROSSI", dob)
            .expect("lookup");
        assert_eq!(found.map(|player| player.id.0), Some("player-1".to_string()));
        assert!(store
            .find_by_identity("Marco Rossi", None)
            .expect("lookup")
            .is_none());
    }

    #[test]
    fn duplicate_ids_conflict_and_missing_ids_are_not_found() {
        let store = InMemoryPlayerStore::default();
        let player = StoredPlayer {
            id: PlayerId("player-1".to_string()),
            profile: PlayerRecord::named("Filippo Berardi"),
            assessment: None,
        };
        store.insert(player.clone()).expect("insert");

        assert!(matches!(store.insert(player), Err(StoreError::Conflict)));
        assert!(matches!(
            store.apply_assessment(
                &PlayerId("player-2".to_string()),
                EligibilityAssessment::default()
            ),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn parse_date_reports_input() {
        assert!(parse_date("2025-06-01").is_ok());
        let err = parse_date("01/06/2025").expect_err("rejected");
        assert!(err.contains("01/06/2025"));
    }
}
