use std::sync::Arc;
use std::time::Duration;

use pool_core::repositories::{ReadingRepository, UserRepository};
use pool_core::services::{AuthService, DashboardCache, DashboardService, ReadingService};
use pool_security::SessionStore;
use pool_shared::config::{DashboardSettings, SessionSettings};

/// Shared handler state. Services sit behind trait objects so the same
/// router serves the PostgreSQL and in-memory stores.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<dyn UserRepository>>,
    pub readings: Arc<ReadingService<dyn ReadingRepository>>,
    pub dashboard: Arc<DashboardService<dyn ReadingRepository>>,
    pub session: SessionSettings,
    pub service_name: String,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        readings: Arc<dyn ReadingRepository>,
        session: SessionSettings,
        dashboard: &DashboardSettings,
    ) -> Self {
        let cache = DashboardCache::with_ttl(Duration::from_secs(dashboard.cache_ttl_seconds));

        Self {
            auth: Arc::new(
                AuthService::new(users, SessionStore::new())
                    .with_session_max_age(Duration::from_secs(session.max_age_seconds)),
            ),
            readings: Arc::new(ReadingService::new(Arc::clone(&readings))),
            dashboard: Arc::new(DashboardService::new(readings, cache)),
            session,
            service_name: env!("CARGO_PKG_NAME").to_string(),
        }
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }
}
