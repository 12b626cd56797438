//! In-memory record store.
//!
//! Implements both repository ports over one shared map, keeping the same
//! uniqueness rule on reference ids as the database schema.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use pool_core::domain::{Hotel, Measurements, NewReading, Reading, ReadingFilter, ReadingStatus, User};
use pool_core::error::DomainError;
use pool_core::repositories::{ReadingRepository, UserRepository};

#[derive(Default)]
struct MemoryState {
    hotels: HashMap<Uuid, Hotel>,
    users: HashMap<Uuid, User>,
    readings: HashMap<Uuid, Reading>,
    /// reference id -> reading id
    references: HashMap<String, Uuid>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hotel(&self, name: impl Into<String>) -> Hotel {
        let hotel = Hotel::new(name);
        self.state.write().hotels.insert(hotel.id, hotel.clone());
        hotel
    }

    /// Stores `user` as given. Its hotel, if any, is registered too.
    pub fn add_user(&self, user: User) -> User {
        let mut state = self.state.write();
        if let Some(hotel) = &user.hotel {
            state.hotels.entry(hotel.id).or_insert_with(|| hotel.clone());
        }
        state.users.insert(user.id, user.clone());
        user
    }

    pub fn remove_user(&self, id: &Uuid) -> Option<User> {
        self.state.write().users.remove(id)
    }

    pub fn reading_count(&self) -> usize {
        self.state.read().readings.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.state.read().users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .state
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

/// The stored reading, provided its status is still `expected`.
fn guarded<'a>(
    state: &'a mut MemoryState,
    id: &Uuid,
    expected: ReadingStatus,
) -> Result<&'a mut Reading, DomainError> {
    let reading = state
        .readings
        .get_mut(id)
        .ok_or_else(|| DomainError::ReadingNotFound(id.to_string()))?;
    if reading.status != expected {
        warn!(
            "Reading {} is {} now, expected {}; write skipped",
            reading.reference_id, reading.status, expected
        );
        return Err(DomainError::StatusChanged {
            expected,
            actual: reading.status,
        });
    }
    Ok(reading)
}

#[async_trait]
impl ReadingRepository for MemoryStore {
    async fn create(&self, reading: &NewReading) -> Result<Reading, DomainError> {
        let mut state = self.state.write();
        if state.references.contains_key(&reading.reference_id) {
            warn!("Reference id collision: {}", reading.reference_id);
            return Err(DomainError::DuplicateReference(reading.reference_id.clone()));
        }
        if !state.hotels.contains_key(&reading.hotel.id) {
            return Err(DomainError::DatabaseError(format!(
                "hotel {} does not exist",
                reading.hotel.id
            )));
        }

        let stored = reading.clone().into_reading();
        state.references.insert(stored.reference_id.clone(), stored.id);
        state.readings.insert(stored.id, stored.clone());
        debug!("Reading stored in memory: {}", stored.reference_id);
        Ok(stored)
    }

    async fn find_by_reference_id(&self, reference_id: &str) -> Result<Option<Reading>, DomainError> {
        let state = self.state.read();
        Ok(state
            .references
            .get(reference_id)
            .and_then(|id| state.readings.get(id))
            .cloned())
    }

    async fn update_status(
        &self,
        id: &Uuid,
        expected: ReadingStatus,
        status: ReadingStatus,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write();
        let reading = guarded(&mut state, id, expected)?;
        reading.status = status;
        Ok(())
    }

    async fn update_measurements(
        &self,
        id: &Uuid,
        expected: ReadingStatus,
        measurements: &Measurements,
        status: ReadingStatus,
    ) -> Result<Reading, DomainError> {
        let mut state = self.state.write();
        let reading = guarded(&mut state, id, expected)?;
        reading.measurements = measurements.clone();
        reading.status = status;
        Ok(reading.clone())
    }

    async fn list(&self, filter: &ReadingFilter) -> Result<Vec<Reading>, DomainError> {
        let mut readings: Vec<Reading> = self
            .state
            .read()
            .readings
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        readings.sort_by(|a, b| b.submission_date.cmp(&a.submission_date));
        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pool_core::domain::ReadingData;

    fn new_reading(hotel: &Hotel, user: &User, seconds: i64) -> NewReading {
        let at = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap() + Duration::seconds(seconds);
        let measurements = ReadingData::default().validate_measurements().unwrap();
        NewReading::submitted(hotel, user, measurements, at)
    }

    #[tokio::test]
    async fn test_duplicate_reference_is_rejected() {
        let store = MemoryStore::new();
        let hotel = store.add_hotel("Grand Otel");
        let user = store.add_user(User::new("ayse", "h", Some(hotel.clone())));

        store.create(&new_reading(&hotel, &user, 0)).await.unwrap();
        let err = store.create(&new_reading(&hotel, &user, 0)).await.unwrap_err();

        assert!(matches!(err, DomainError::DuplicateReference(_)));
        assert_eq!(store.reading_count(), 1);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_filtered() {
        let store = MemoryStore::new();
        let grand = store.add_hotel("Grand Otel");
        let deniz = store.add_hotel("Deniz Otel");
        let ayse = store.add_user(User::new("ayse", "h", Some(grand.clone())));
        let can = store.add_user(User::new("can", "h", Some(deniz.clone())));

        store.create(&new_reading(&grand, &ayse, 0)).await.unwrap();
        store.create(&new_reading(&grand, &ayse, 60)).await.unwrap();
        store.create(&new_reading(&deniz, &can, 30)).await.unwrap();

        let all = store.list(&ReadingFilter::all()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].submission_date >= w[1].submission_date));

        let grand_only = store.list(&ReadingFilter::for_hotel(grand.id)).await.unwrap();
        assert_eq!(grand_only.len(), 2);
        assert!(grand_only.iter().all(|r| r.hotel.id == grand.id));
    }

    #[tokio::test]
    async fn test_find_by_username_is_exact() {
        let store = MemoryStore::new();
        store.add_user(User::new("ayse", "h", None));

        assert!(store.find_by_username("ayse").await.unwrap().is_some());
        assert!(store.find_by_username("Ayse").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_reading_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_status(&Uuid::new_v4(), ReadingStatus::Submitted, ReadingStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ReadingNotFound(_)));
    }

    #[tokio::test]
    async fn test_writes_require_expected_status() {
        let store = MemoryStore::new();
        let hotel = store.add_hotel("Grand Otel");
        let user = store.add_user(User::new("ayse", "h", Some(hotel.clone())));
        let reading = store.create(&new_reading(&hotel, &user, 0)).await.unwrap();

        store
            .update_status(&reading.id, ReadingStatus::Submitted, ReadingStatus::InProgress)
            .await
            .unwrap();

        let err = store
            .update_status(&reading.id, ReadingStatus::Submitted, ReadingStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::StatusChanged { actual: ReadingStatus::InProgress, .. }
        ));

        let mut revised = reading.measurements.clone();
        revised.ph_level = 7.8;
        let err = store
            .update_measurements(&reading.id, ReadingStatus::Submitted, &revised, ReadingStatus::Submitted)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::StatusChanged { .. }));

        let stored = store.find_by_reference_id(&reading.reference_id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReadingStatus::InProgress);
        assert_eq!(stored.measurements, reading.measurements);
    }
}
