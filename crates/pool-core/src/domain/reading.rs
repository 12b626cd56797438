// ============================================================================
// Pool Core - Reading Entity
// File: crates/pool-core/src/domain/reading.rs
// Description: A submitted pool inspection and its creation payload
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hotel::Hotel;
use super::reading_status::ReadingStatus;
use super::reference_id::derive_reference_id;
use super::user::{Submitter, User};
use super::water_clarity::WaterClarity;

/// Validated measurement fields of a reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub ph_level: f64,
    pub chlorine_ppm: f64,
    pub alkalinity_ppm: i32,
    pub temperature_celsius: f64,
    pub water_clarity: WaterClarity,
    pub notes: String,
}

/// Reading entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: Uuid,
    /// Assigned once on first persist, never regenerated.
    pub reference_id: String,
    pub hotel: Hotel,
    pub submitted_by: Submitter,
    pub submission_date: DateTime<Utc>,
    #[serde(flatten)]
    pub measurements: Measurements,
    pub status: ReadingStatus,
}

impl Reading {
    pub fn is_readonly_for(&self, viewer: &User) -> bool {
        self.status.is_readonly() && !viewer.is_admin
    }
}

/// Payload handed to the store on first persist. The reference id is fixed
/// here, before the row exists.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub id: Uuid,
    pub reference_id: String,
    pub hotel: Hotel,
    pub submitted_by: Submitter,
    pub submission_date: DateTime<Utc>,
    pub measurements: Measurements,
    pub status: ReadingStatus,
}

impl NewReading {
    /// A reading entering the workflow through submission.
    pub fn submitted(
        hotel: &Hotel,
        submitter: &User,
        measurements: Measurements,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reference_id: derive_reference_id(&hotel.name, &submitter.username, submitted_at),
            hotel: hotel.clone(),
            submitted_by: Submitter::from(submitter),
            submission_date: submitted_at,
            measurements,
            status: ReadingStatus::Submitted,
        }
    }

    pub fn into_reading(self) -> Reading {
        Reading {
            id: self.id,
            reference_id: self.reference_id,
            hotel: self.hotel,
            submitted_by: self.submitted_by,
            submission_date: self.submission_date,
            measurements: self.measurements,
            status: self.status,
        }
    }
}

/// Listing filter. `hotel_id = None` lists every hotel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadingFilter {
    pub hotel_id: Option<Uuid>,
}

impl ReadingFilter {
    pub fn all() -> Self {
        Self { hotel_id: None }
    }

    pub fn for_hotel(hotel_id: Uuid) -> Self {
        Self {
            hotel_id: Some(hotel_id),
        }
    }

    pub fn matches(&self, reading: &Reading) -> bool {
        self.hotel_id.map_or(true, |id| reading.hotel.id == id)
    }
}
