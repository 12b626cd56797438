//! Reading repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Measurements, NewReading, Reading, ReadingFilter, ReadingStatus};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Persists a new reading. A taken reference id must surface as
    /// `DomainError::DuplicateReference`, never as an overwrite.
    async fn create(&self, reading: &NewReading) -> Result<Reading, DomainError>;
    async fn find_by_reference_id(&self, reference_id: &str) -> Result<Option<Reading>, DomainError>;
    /// Single-field status write, applied only while the stored status is
    /// still `expected`. Otherwise nothing is written and
    /// `DomainError::StatusChanged` carries the stored status.
    async fn update_status(
        &self,
        id: &Uuid,
        expected: ReadingStatus,
        status: ReadingStatus,
    ) -> Result<(), DomainError>;
    /// Rewrites measurement fields and status under the same `expected`
    /// guard as [`update_status`](Self::update_status). Identity fields stay
    /// as they are.
    async fn update_measurements(
        &self,
        id: &Uuid,
        expected: ReadingStatus,
        measurements: &Measurements,
        status: ReadingStatus,
    ) -> Result<Reading, DomainError>;
    /// Newest first.
    async fn list(&self, filter: &ReadingFilter) -> Result<Vec<Reading>, DomainError>;
}
