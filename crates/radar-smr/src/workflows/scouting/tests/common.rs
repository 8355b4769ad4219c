use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use crate::workflows::scouting::domain::{CountryCode, PlayerId, PlayerRecord};
use crate::workflows::scouting::eligibility::{
    EligibilityAssessment, EligibilityEngine, EligibilityRules,
};
use crate::workflows::scouting::merge::normalize_name;
use crate::workflows::scouting::repository::{PlayerStore, StoreError, StoredPlayer};
use crate::workflows::scouting::residence::{ResidenceEntry, ResidenceHistory};
use crate::workflows::scouting::service::PlayerRadarService;

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn born_years_ago(years: i32) -> NaiveDate {
    let today = as_of();
    NaiveDate::from_ymd_opt(today.year() - years, today.month(), today.day()).expect("valid dob")
}

pub(super) fn code(raw: &str) -> CountryCode {
    CountryCode::parse(raw).expect("valid country code")
}

pub(super) fn rules() -> EligibilityRules {
    EligibilityRules::san_marino()
}

pub(super) fn engine() -> EligibilityEngine {
    EligibilityEngine::new(rules())
}

pub(super) fn residence(entries: &[(&str, f64)]) -> ResidenceHistory {
    ResidenceHistory::new(
        entries
            .iter()
            .map(|(country, years)| {
                ResidenceEntry::new(code(country), *years).expect("valid residence entry")
            })
            .collect(),
    )
}

pub(super) fn player(name: &str, nationality: Option<&str>) -> PlayerRecord {
    let mut record = PlayerRecord::named(name);
    record.nationality = nationality.map(code);
    record
}

/// Scenario A: born and raised in the target nation.
pub(super) fn native_citizen() -> PlayerRecord {
    let mut record = player("Filippo Berardi", Some("SMR"));
    record.birth_country = Some(code("SMR"));
    record.dob = Some(born_years_ago(27));
    record
}

/// Italian national with long residency in the target nation.
pub(super) fn resident_italian(years: f64, age: i32) -> PlayerRecord {
    let mut record = player("Marco Rossi", Some("ITA"));
    record.dob = Some(born_years_ago(age));
    record.residence_history = residence(&[("ITA", 4.0), ("SMR", years)]);
    record
}

pub(super) fn stored(id: &str, profile: PlayerRecord) -> StoredPlayer {
    StoredPlayer {
        id: PlayerId(id.to_string()),
        profile,
        assessment: None,
    }
}

pub(super) fn build_service() -> (PlayerRadarService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = PlayerRadarService::new(store.clone(), rules());
    (service, store)
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) players: Arc<Mutex<BTreeMap<PlayerId, StoredPlayer>>>,
}

impl MemoryStore {
    pub(super) fn seeded(players: Vec<StoredPlayer>) -> Self {
        let store = MemoryStore::default();
        {
            let mut guard = store.players.lock().expect("store mutex poisoned");
            for player in players {
                guard.insert(player.id.clone(), player);
            }
        }
        store
    }

    pub(super) fn snapshot(&self, id: &str) -> StoredPlayer {
        self.players
            .lock()
            .expect("store mutex poisoned")
            .get(&PlayerId(id.to_string()))
            .cloned()
            .expect("player stored")
    }
}

impl PlayerStore for MemoryStore {
    fn insert(&self, player: StoredPlayer) -> Result<StoredPlayer, StoreError> {
        let mut guard = self.players.lock().expect("store mutex poisoned");
        if guard.contains_key(&player.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(player.id.clone(), player.clone());
        Ok(player)
    }

    fn update_profile(&self, id: &PlayerId, profile: PlayerRecord) -> Result<(), StoreError> {
        let mut guard = self.players.lock().expect("store mutex poisoned");
        let player = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        player.profile = profile;
        Ok(())
    }

    fn apply_assessment(
        &self,
        id: &PlayerId,
        assessment: EligibilityAssessment,
    ) -> Result<(), StoreError> {
        let mut guard = self.players.lock().expect("store mutex poisoned");
        let player = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        player.assessment = Some(assessment);
        Ok(())
    }

    fn fetch(&self, id: &PlayerId) -> Result<Option<StoredPlayer>, StoreError> {
        let guard = self.players.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_identity(
        &self,
        name: &str,
        dob: Option<NaiveDate>,
    ) -> Result<Option<StoredPlayer>, StoreError> {
        let wanted = normalize_name(name);
        let guard = self.players.lock().expect("store mutex poisoned");
        Ok(guard
            .values()
            .find(|player| {
                normalize_name(&player.profile.name) == wanted && player.profile.dob == dob
            })
            .cloned())
    }

    fn all(&self) -> Result<Vec<StoredPlayer>, StoreError> {
        let guard = self.players.lock().expect("store mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Store that lists players but refuses assessment writes for one of them.
pub(super) struct FlakyWriteStore {
    pub(super) inner: MemoryStore,
    pub(super) rejected: PlayerId,
}

impl PlayerStore for FlakyWriteStore {
    fn insert(&self, player: StoredPlayer) -> Result<StoredPlayer, StoreError> {
        self.inner.insert(player)
    }

    fn update_profile(&self, id: &PlayerId, profile: PlayerRecord) -> Result<(), StoreError> {
        self.inner.update_profile(id, profile)
    }

    fn apply_assessment(
        &self,
        id: &PlayerId,
        assessment: EligibilityAssessment,
    ) -> Result<(), StoreError> {
        if id == &self.rejected {
            return Err(StoreError::Unavailable("write timeout".to_string()));
        }
        self.inner.apply_assessment(id, assessment)
    }

    fn fetch(&self, id: &PlayerId) -> Result<Option<StoredPlayer>, StoreError> {
        self.inner.fetch(id)
    }

    fn find_by_identity(
        &self,
        name: &str,
        dob: Option<NaiveDate>,
    ) -> Result<Option<StoredPlayer>, StoreError> {
        self.inner.find_by_identity(name, dob)
    }

    fn all(&self) -> Result<Vec<StoredPlayer>, StoreError> {
        self.inner.all()
    }
}

pub(super) struct UnavailableStore;

impl PlayerStore for UnavailableStore {
    fn insert(&self, _player: StoredPlayer) -> Result<StoredPlayer, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_profile(&self, _id: &PlayerId, _profile: PlayerRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn apply_assessment(
        &self,
        _id: &PlayerId,
        _assessment: EligibilityAssessment,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &PlayerId) -> Result<Option<StoredPlayer>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn find_by_identity(
        &self,
        _name: &str,
        _dob: Option<NaiveDate>,
    ) -> Result<Option<StoredPlayer>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<StoredPlayer>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
