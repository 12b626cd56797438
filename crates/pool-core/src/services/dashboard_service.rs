//! Dashboard listing built from readings, fronted by [`DashboardCache`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

use pool_shared::constants::DISPLAY_DATE_FORMAT;

use crate::domain::{Reading, ReadingFilter, User};
use crate::error::DomainError;
use crate::repositories::ReadingRepository;
use super::dashboard_cache::DashboardCache;

/// One dashboard line. A flat projection, decoupled from the entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRow {
    pub reference_id: String,
    pub hotel_name: String,
    pub submitted_by: String,
    pub submission_date: String,
    pub status: String,
    pub ph_level: f64,
    pub chlorine_ppm: f64,
    pub water_clarity: String,
}

impl From<&Reading> for SubmissionRow {
    fn from(reading: &Reading) -> Self {
        Self {
            reference_id: reading.reference_id.clone(),
            hotel_name: reading.hotel.name.clone(),
            submitted_by: reading.submitted_by.username.clone(),
            submission_date: reading.submission_date.format(DISPLAY_DATE_FORMAT).to_string(),
            status: reading.status.label().to_string(),
            ph_level: reading.measurements.ph_level,
            chlorine_ppm: reading.measurements.chlorine_ppm,
            water_clarity: reading.measurements.water_clarity.label().to_string(),
        }
    }
}

pub struct DashboardService<R: ReadingRepository + ?Sized> {
    reading_repo: Arc<R>,
    cache: DashboardCache,
}

impl<R: ReadingRepository + ?Sized> DashboardService<R> {
    pub fn new(reading_repo: Arc<R>, cache: DashboardCache) -> Self {
        Self { reading_repo, cache }
    }

    pub fn cache(&self) -> &DashboardCache {
        &self.cache
    }

    /// Rows visible to `viewer`. `force_refresh` skips the cache lookup and
    /// repopulates the slot. Store errors propagate; nothing stale is served.
    pub async fn load(&self, viewer: &User, force_refresh: bool) -> Result<Arc<Vec<SubmissionRow>>, DomainError> {
        if force_refresh {
            self.cache.invalidate();
        } else if let Some(rows) = self.cache.get(viewer.id) {
            debug!("Dashboard cache hit for {}", viewer.username);
            return Ok(rows);
        }

        let rows = Arc::new(self.build_rows(viewer).await?);
        self.cache.set(viewer.id, Arc::clone(&rows));

        info!("Dashboard rebuilt for {} ({} rows)", viewer.username, rows.len());
        Ok(rows)
    }

    async fn build_rows(&self, viewer: &User) -> Result<Vec<SubmissionRow>, DomainError> {
        let filter = if viewer.is_admin {
            ReadingFilter::all()
        } else {
            match viewer.hotel_id() {
                Some(hotel_id) => ReadingFilter::for_hotel(hotel_id),
                None => {
                    debug!("User {} has no hotel, dashboard is empty", viewer.username);
                    return Ok(Vec::new());
                }
            }
        };

        let readings = self.reading_repo.list(&filter).await.map_err(|e| {
            error!("Error loading dashboard for {}: {}", viewer.username, e);
            e
        })?;

        Ok(readings.iter().map(SubmissionRow::from).collect())
    }
}
