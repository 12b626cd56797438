//! End-to-end service flows over the in-memory record store.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use pool_core::domain::{Measurements, NewReading, Reading, ReadingData, ReadingFilter, ReadingStatus, User};
use pool_core::error::{DomainError, ErrorKind};
use pool_core::repositories::ReadingRepository;
use pool_core::services::{AuthService, Clock, DashboardCache, DashboardService, ReadingService};
use pool_infrastructure::MemoryStore;
use pool_security::{PasswordService, SessionStore, SessionToken};

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Every load is followed by a reviewer moving the reading to
/// `review_status`, before the caller gets to write.
struct ReviewedOnLoad {
    inner: Arc<MemoryStore>,
    review_status: ReadingStatus,
}

#[async_trait]
impl ReadingRepository for ReviewedOnLoad {
    async fn create(&self, reading: &NewReading) -> Result<Reading, DomainError> {
        self.inner.create(reading).await
    }

    async fn find_by_reference_id(&self, reference_id: &str) -> Result<Option<Reading>, DomainError> {
        let snapshot = self.inner.find_by_reference_id(reference_id).await?;
        if let Some(reading) = &snapshot {
            if reading.status != self.review_status {
                self.inner
                    .update_status(&reading.id, reading.status, self.review_status)
                    .await?;
            }
        }
        Ok(snapshot)
    }

    async fn update_status(
        &self,
        id: &Uuid,
        expected: ReadingStatus,
        status: ReadingStatus,
    ) -> Result<(), DomainError> {
        self.inner.update_status(id, expected, status).await
    }

    async fn update_measurements(
        &self,
        id: &Uuid,
        expected: ReadingStatus,
        measurements: &Measurements,
        status: ReadingStatus,
    ) -> Result<Reading, DomainError> {
        self.inner.update_measurements(id, expected, measurements, status).await
    }

    async fn list(&self, filter: &ReadingFilter) -> Result<Vec<Reading>, DomainError> {
        self.inner.list(filter).await
    }
}

struct Fixture {
    store: Arc<MemoryStore>,
    staff_grand: User,
    staff_deniz: User,
    admin: User,
}

fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let grand = store.add_hotel("Grand Otel");
    let deniz = store.add_hotel("Deniz Otel");
    let hash = PasswordService::hash_bcrypt("havuz123", 4).unwrap();

    let staff_grand = store.add_user(User::new("ayse", hash.clone(), Some(grand)));
    let staff_deniz = store.add_user(User::new("can", hash.clone(), Some(deniz)));
    let admin = store.add_user(User::admin("yonetici", hash));

    Fixture { store, staff_grand, staff_deniz, admin }
}

fn readings_at(store: &Arc<MemoryStore>, at: DateTime<Utc>) -> ReadingService<MemoryStore> {
    ReadingService::new(Arc::clone(store)).with_clock(Arc::new(FixedClock(at)))
}

fn at(second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, second).unwrap()
}

#[tokio::test]
async fn login_then_resolve_then_logout() {
    let f = fixture();
    let auth = AuthService::new(Arc::clone(&f.store), SessionStore::new());

    let login = auth.login("ayse", "havuz123").await;
    assert!(login.outcome.success());
    let token = login.token.expect("token issued on success");

    let current = auth.resolve_current_user(&token).await.unwrap();
    assert_eq!(current.id, f.staff_grand.id);
    assert_eq!(current.hotel_id(), f.staff_grand.hotel_id());

    auth.logout(&token);
    assert!(auth.resolve_current_user(&token).await.is_none());
}

#[tokio::test]
async fn wrong_password_issues_no_session() {
    let f = fixture();
    let sessions = SessionStore::new();
    let auth = AuthService::new(Arc::clone(&f.store), sessions.clone());

    let login = auth.login("ayse", "yanlis").await;
    assert!(!login.outcome.success());
    assert!(login.token.is_none());
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn stale_session_is_cleared() {
    let f = fixture();
    let sessions = SessionStore::new();
    let auth = AuthService::new(Arc::clone(&f.store), sessions.clone());
    let token = SessionToken::generate();

    auth.store_session(&token, &f.staff_deniz);
    f.store.remove_user(&f.staff_deniz.id);

    assert!(auth.resolve_current_user(&token).await.is_none());
    assert!(sessions.user_id(&token).is_none());
    assert!(auth.resolve_current_user(&token).await.is_none());
}

#[tokio::test]
async fn dashboard_scoping_across_hotels() {
    let f = fixture();
    assert!(readings_at(&f.store, at(1)).submit(&ReadingData::default(), &f.staff_grand).await.success());
    assert!(readings_at(&f.store, at(2)).submit(&ReadingData::default(), &f.staff_deniz).await.success());

    let dashboard = DashboardService::new(Arc::clone(&f.store), DashboardCache::new());

    let staff_rows = dashboard.load(&f.staff_grand, false).await.unwrap();
    assert_eq!(staff_rows.len(), 1);
    assert_eq!(staff_rows[0].hotel_name, "Grand Otel");

    let admin_rows = dashboard.load(&f.admin, false).await.unwrap();
    assert_eq!(admin_rows.len(), 2);
    assert_eq!(admin_rows[0].hotel_name, "Deniz Otel");
}

#[tokio::test]
async fn status_update_keeps_reference_id() {
    let f = fixture();
    let service = readings_at(&f.store, at(5));
    let outcome = service.submit(&ReadingData::default(), &f.staff_grand).await;
    let reference_id = outcome.reference_id().unwrap().to_string();
    assert_eq!(reference_id, "Grand Otel__ayse__20240701_090005");

    let mut reading = service.find_by_reference_id(&reference_id).await.unwrap();
    assert!(service.update_status(&mut reading, "completed", &f.admin).await);

    let stored = service.find_by_reference_id(&reference_id).await.unwrap();
    assert_eq!(stored.status, ReadingStatus::Completed);
    assert_eq!(stored.reference_id, reference_id);

    let view = service.view(&reference_id, &f.staff_grand).await.unwrap();
    assert!(view.is_readonly);
    let revise = service.revise(&reference_id, &ReadingData::default(), &f.staff_grand).await;
    assert!(!revise.success());
}

#[tokio::test]
async fn same_second_submission_conflicts() {
    let f = fixture();
    let service = readings_at(&f.store, at(7));

    assert!(service.submit(&ReadingData::default(), &f.staff_grand).await.success());
    let second = service.submit(&ReadingData::default(), &f.staff_grand).await;

    assert!(!second.success());
    assert_eq!(second.error().unwrap().kind(), ErrorKind::Conflict);
    assert_eq!(f.store.reading_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn dashboard_cache_expires_after_ttl() {
    let f = fixture();
    let dashboard = DashboardService::new(Arc::clone(&f.store), DashboardCache::new());

    assert!(dashboard.load(&f.admin, false).await.unwrap().is_empty());
    readings_at(&f.store, at(9)).submit(&ReadingData::default(), &f.staff_grand).await;

    // still the cached, empty listing
    assert!(dashboard.load(&f.admin, false).await.unwrap().is_empty());

    tokio::time::advance(Duration::from_secs(60)).await;
    assert_eq!(dashboard.load(&f.admin, false).await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_logins_get_distinct_tokens() {
    let f = fixture();
    let auth = Arc::new(AuthService::new(Arc::clone(&f.store), SessionStore::new()));

    let attempts = ["ayse", "can", "yonetici", "ayse"].into_iter().map(|username| {
        let auth = Arc::clone(&auth);
        tokio::spawn(async move { auth.login(username, "havuz123").await })
    });
    let results = futures::future::join_all(attempts).await;

    let mut tokens: Vec<String> = results
        .into_iter()
        .map(|r| r.unwrap().token.unwrap().as_str().to_string())
        .collect();
    tokens.sort();
    tokens.dedup();
    assert_eq!(tokens.len(), 4);
    assert_eq!(auth.sessions().len(), 4);
}

#[tokio::test]
async fn staff_revision_racing_review_does_not_regress_status() {
    let f = fixture();
    let outcome = readings_at(&f.store, at(11)).submit(&ReadingData::default(), &f.staff_grand).await;
    let reference_id = outcome.reference_id().unwrap().to_string();

    let racing = ReadingService::new(Arc::new(ReviewedOnLoad {
        inner: Arc::clone(&f.store),
        review_status: ReadingStatus::InProgress,
    }));
    let revised = ReadingData { ph_level: 7.9, ..Default::default() };
    let outcome = racing.revise(&reference_id, &revised, &f.staff_grand).await;

    assert!(!outcome.success());
    assert!(matches!(outcome.error(), Some(DomainError::ReadonlyReading(_))));

    let stored = readings_at(&f.store, at(12)).find_by_reference_id(&reference_id).await.unwrap();
    assert_eq!(stored.status, ReadingStatus::InProgress);
    assert_eq!(stored.measurements.ph_level, ReadingData::default().ph_level);
}

#[tokio::test]
async fn status_move_racing_completion_does_not_regress() {
    let f = fixture();
    let outcome = readings_at(&f.store, at(13)).submit(&ReadingData::default(), &f.staff_grand).await;
    let reference_id = outcome.reference_id().unwrap().to_string();

    let racing = ReadingService::new(Arc::new(ReviewedOnLoad {
        inner: Arc::clone(&f.store),
        review_status: ReadingStatus::Completed,
    }));
    let mut reading = racing.find_by_reference_id(&reference_id).await.unwrap();
    assert_eq!(reading.status, ReadingStatus::Submitted);

    let result = racing.try_update_status(&mut reading, "in_progress", &f.admin).await;

    assert!(matches!(result, Err(DomainError::StatusRegression { .. })));
    assert_eq!(reading.status, ReadingStatus::Completed);
    let stored = f.store.find_by_reference_id(&reference_id).await.unwrap().unwrap();
    assert_eq!(stored.status, ReadingStatus::Completed);
}
