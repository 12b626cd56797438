// ============================================================================
// Pool Core - Reading Workflow Service
// File: crates/pool-core/src/services/reading_service.rs
// ============================================================================
//! Submission, revision and status lifecycle of pool readings.
//!
//! Readonly and forward-only rules are enforced here, independent of what
//! the form lets a user touch.

use std::sync::Arc;
use tracing::{error, info, warn};

use pool_shared::messages;

use crate::domain::{NewReading, Reading, ReadingData, ReadingStatus, User};
use crate::error::{DomainError, ErrorKind};
use crate::repositories::ReadingRepository;
use super::clock::{Clock, SystemClock};

pub struct ReadingService<R: ReadingRepository + ?Sized> {
    reading_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ReadingRepository + ?Sized> ReadingService<R> {
    pub fn new(reading_repo: Arc<R>) -> Self {
        Self {
            reading_repo,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Submit a new reading on behalf of `user`.
    pub async fn submit(&self, data: &ReadingData, user: &User) -> SubmissionOutcome {
        match self.try_submit(data, user).await {
            Ok(reading) => {
                info!(
                    "Pool reading submitted successfully: {} by user {}",
                    reading.reference_id, user.username
                );
                SubmissionOutcome::accepted(reading)
            }
            Err(e) => SubmissionOutcome::rejected(e, &user.username, None),
        }
    }

    async fn try_submit(&self, data: &ReadingData, user: &User) -> Result<Reading, DomainError> {
        // 1. A reading without an owning hotel is meaningless
        let hotel = user
            .hotel
            .as_ref()
            .ok_or_else(|| DomainError::NoHotelAssigned(user.username.clone()))?;

        // 2. Validate before any write
        let measurements = data.validate_measurements()?;

        // 3. Reference id is fixed now, once
        let new_reading = NewReading::submitted(hotel, user, measurements, self.clock.now());
        self.reading_repo.create(&new_reading).await
    }

    /// Revise the measurements of an existing reading.
    ///
    /// Non-admins may only revise their own hotel's readings and only while
    /// the reading is not readonly. Status moves to `submitted` unless it is
    /// already further along.
    pub async fn revise(&self, reference_id: &str, data: &ReadingData, actor: &User) -> SubmissionOutcome {
        match self.try_revise(reference_id, data, actor).await {
            Ok(reading) => {
                info!(
                    "Pool reading {} revised by user {} (status: {})",
                    reading.reference_id, actor.username, reading.status
                );
                SubmissionOutcome::accepted(reading)
            }
            Err(e) => SubmissionOutcome::rejected(e, &actor.username, Some(reference_id)),
        }
    }

    async fn try_revise(&self, reference_id: &str, data: &ReadingData, actor: &User) -> Result<Reading, DomainError> {
        let reading = self
            .reading_repo
            .find_by_reference_id(reference_id)
            .await?
            .ok_or_else(|| DomainError::ReadingNotFound(reference_id.to_string()))?;

        if !actor.can_access_hotel(reading.hotel.id) {
            return Err(DomainError::Unauthorized(format!(
                "{} cannot edit readings of {}",
                actor.username, reading.hotel.name
            )));
        }
        if reading.is_readonly_for(actor) {
            return Err(DomainError::ReadonlyReading(reading.reference_id));
        }

        let measurements = data.validate_measurements()?;
        let status = reading.status.after_revision();
        self.reading_repo
            .update_measurements(&reading.id, reading.status, &measurements, status)
            .await
            .map_err(|e| match e {
                // Moved on between load and write; re-check against the stored status
                DomainError::StatusChanged { actual, .. } if actual.is_readonly() && !actor.is_admin => {
                    DomainError::ReadonlyReading(reading.reference_id.clone())
                }
                DomainError::StatusChanged { actual, .. } if !actual.can_transition_to(status) => {
                    DomainError::StatusRegression { from: actual, to: status }
                }
                other => other,
            })
    }

    /// Move a reading to `new_status`. Returns `false` on any failure; the
    /// reason is logged.
    pub async fn update_status(&self, reading: &mut Reading, new_status: &str, actor: &User) -> bool {
        match self.try_update_status(reading, new_status, actor).await {
            Ok(_) => true,
            Err(e) => {
                match e.kind() {
                    ErrorKind::StoreFailure => error!(
                        "Error updating reading {} status: {}",
                        reading.reference_id, e
                    ),
                    _ => warn!(
                        "Status update of {} to {:?} by {} rejected: {}",
                        reading.reference_id, new_status, actor.username, e
                    ),
                }
                false
            }
        }
    }

    /// Typed variant of [`update_status`](Self::update_status).
    ///
    /// The write only lands if the stored status still equals
    /// `reading.status`. When it has moved, `reading.status` is refreshed to
    /// the stored value and the move is re-judged against it.
    pub async fn try_update_status(
        &self,
        reading: &mut Reading,
        new_status: &str,
        actor: &User,
    ) -> Result<ReadingStatus, DomainError> {
        let target = ReadingStatus::from_str(new_status)
            .ok_or_else(|| DomainError::InvalidStatus(new_status.to_string()))?;

        if !actor.is_admin {
            return Err(DomainError::Unauthorized(format!(
                "{} may not change reading status",
                actor.username
            )));
        }

        if target == reading.status {
            return Ok(target);
        }
        if !reading.status.can_transition_to(target) {
            return Err(DomainError::StatusRegression {
                from: reading.status,
                to: target,
            });
        }

        match self.reading_repo.update_status(&reading.id, reading.status, target).await {
            Ok(()) => {}
            Err(DomainError::StatusChanged { expected, actual }) => {
                reading.status = actual;
                if actual == target {
                    return Ok(target);
                }
                if !actual.can_transition_to(target) {
                    return Err(DomainError::StatusRegression { from: actual, to: target });
                }
                return Err(DomainError::StatusChanged { expected, actual });
            }
            Err(e) => return Err(e),
        }
        reading.status = target;

        info!(
            "Reading {} status updated to {} by {}",
            reading.reference_id, target, actor.username
        );
        Ok(target)
    }

    pub async fn find_by_reference_id(&self, reference_id: &str) -> Option<Reading> {
        match self.reading_repo.find_by_reference_id(reference_id).await {
            Ok(Some(reading)) => Some(reading),
            Ok(None) => {
                warn!("Pool reading not found: {}", reference_id);
                None
            }
            Err(e) => {
                error!("Error loading pool reading {}: {}", reference_id, e);
                None
            }
        }
    }

    /// Load a reading for display to `viewer`, with its edit flags.
    /// Readings of other hotels are invisible to non-admins.
    pub async fn view(&self, reference_id: &str, viewer: &User) -> Option<ReadingView> {
        match self.try_view(reference_id, viewer).await {
            Ok(view) => Some(view),
            Err(e) => {
                match e.kind() {
                    ErrorKind::StoreFailure => error!("Error loading pool reading {}: {}", reference_id, e),
                    _ => warn!("Pool reading {} not shown to {}: {}", reference_id, viewer.username, e),
                }
                None
            }
        }
    }

    /// Like [`view`](Self::view), but a store failure stays distinct from
    /// an absent or hidden reading (`ReadingNotFound`).
    pub async fn try_view(&self, reference_id: &str, viewer: &User) -> Result<ReadingView, DomainError> {
        let reading = self
            .reading_repo
            .find_by_reference_id(reference_id)
            .await?
            .ok_or_else(|| DomainError::ReadingNotFound(reference_id.to_string()))?;

        if !viewer.can_access_hotel(reading.hotel.id) {
            warn!(
                "User {} denied access to reading {} of another hotel",
                viewer.username, reference_id
            );
            return Err(DomainError::ReadingNotFound(reference_id.to_string()));
        }
        Ok(ReadingView::new(reading, viewer))
    }
}

/// A reading as presented to one viewer.
#[derive(Debug, Clone)]
pub struct ReadingView {
    pub reading: Reading,
    /// Measurement fields are locked for this viewer.
    pub is_readonly: bool,
    pub can_submit: bool,
    pub can_change_status: bool,
}

impl ReadingView {
    pub fn new(reading: Reading, viewer: &User) -> Self {
        let is_readonly = reading.is_readonly_for(viewer);
        Self {
            reading,
            is_readonly,
            can_submit: !is_readonly,
            can_change_status: viewer.is_admin,
        }
    }
}

/// Result of a submission or revision
#[derive(Debug)]
pub enum SubmissionOutcome {
    Accepted {
        reference_id: String,
        message: String,
        reading: Reading,
    },
    Rejected {
        error: DomainError,
        message: String,
    },
}

impl SubmissionOutcome {
    fn accepted(reading: Reading) -> Self {
        SubmissionOutcome::Accepted {
            reference_id: reading.reference_id.clone(),
            message: messages::SUBMIT_SUCCESS.to_string(),
            reading,
        }
    }

    fn rejected(error: DomainError, username: &str, reference_id: Option<&str>) -> Self {
        let reference = reference_id.unwrap_or("-");
        let message = match &error {
            DomainError::NoHotelAssigned(_) => messages::SUBMIT_NO_HOTEL.to_string(),
            DomainError::ValidationFailed { .. } => {
                format!("{}{}", messages::SUBMIT_VALIDATION_PREFIX, error)
            }
            DomainError::DuplicateReference(_) => messages::SUBMIT_DUPLICATE.to_string(),
            DomainError::ReadingNotFound(_) => messages::READING_NOT_FOUND.to_string(),
            DomainError::ReadonlyReading(_) => messages::SUBMIT_READONLY.to_string(),
            DomainError::Unauthorized(_) => messages::SUBMIT_FORBIDDEN.to_string(),
            DomainError::StatusRegression { .. } | DomainError::StatusChanged { .. } => {
                messages::READING_CHANGED.to_string()
            }
            _ => messages::SUBMIT_FAILURE.to_string(),
        };

        match error.kind() {
            ErrorKind::StoreFailure => error!(
                "Database error during submission by {} (reference: {}): {}",
                username, reference, error
            ),
            _ => warn!(
                "Submission by {} rejected (reference: {}): {}",
                username, reference, error
            ),
        }

        SubmissionOutcome::Rejected { error, message }
    }

    pub fn success(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            SubmissionOutcome::Accepted { message, .. } | SubmissionOutcome::Rejected { message, .. } => {
                message
            }
        }
    }

    pub fn reference_id(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Accepted { reference_id, .. } => Some(reference_id),
            SubmissionOutcome::Rejected { .. } => None,
        }
    }

    pub fn reading(&self) -> Option<&Reading> {
        match self {
            SubmissionOutcome::Accepted { reading, .. } => Some(reading),
            SubmissionOutcome::Rejected { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&DomainError> {
        match self {
            SubmissionOutcome::Accepted { .. } => None,
            SubmissionOutcome::Rejected { error, .. } => Some(error),
        }
    }
}
