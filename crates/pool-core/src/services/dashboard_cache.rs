use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use pool_shared::constants::DEFAULT_CACHE_TTL_SECONDS;

use super::dashboard_service::SubmissionRow;

struct CacheSlot {
    rows: Arc<Vec<SubmissionRow>>,
    stored_at: Instant,
    owner: Uuid,
}

/// Single-slot cache of the most recently built dashboard listing.
///
/// A second viewer's `set` evicts the first. `get` always checks the owner,
/// so a racing writer can only turn a hit into a miss, never serve another
/// viewer's rows.
#[derive(Clone)]
pub struct DashboardCache {
    slot: Arc<Mutex<Option<CacheSlot>>>,
    ttl: Duration,
}

impl Default for DashboardCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached rows for `user_id`, if they are theirs and still fresh.
    pub fn get(&self, user_id: Uuid) -> Option<Arc<Vec<SubmissionRow>>> {
        let slot = self.slot.lock();
        let cached = slot.as_ref()?;

        if cached.owner != user_id {
            debug!("Dashboard cache miss for {}: slot owned by another viewer", user_id);
            return None;
        }
        let age = cached.stored_at.elapsed();
        if age >= self.ttl {
            debug!("Dashboard cache miss for {}: entry expired ({:?} old)", user_id, age);
            return None;
        }

        Some(Arc::clone(&cached.rows))
    }

    /// Overwrites the slot and restarts its clock.
    pub fn set(&self, user_id: Uuid, rows: Arc<Vec<SubmissionRow>>) {
        let mut slot = self.slot.lock();
        *slot = Some(CacheSlot {
            rows,
            stored_at: Instant::now(),
            owner: user_id,
        });
    }

    pub fn invalidate(&self) {
        self.slot.lock().take();
    }
}
