// ============================================================================
// Pool Infrastructure - PostgreSQL Reading Repository
// File: crates/pool-infrastructure/src/database/postgres/reading_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info, warn};
use uuid::Uuid;

use pool_core::domain::{
    Hotel, Measurements, NewReading, Reading, ReadingFilter, ReadingStatus, Submitter, WaterClarity,
};
use pool_core::error::DomainError;
use pool_core::repositories::ReadingRepository;

pub struct PgReadingRepository {
    pool: PgPool,
}

impl PgReadingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: &Uuid) -> Result<Reading, DomainError> {
        let row: ReadingRow = sqlx::query_as(&format!("{SELECT_READING} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("loading reading by id", e))?
            .ok_or_else(|| DomainError::ReadingNotFound(id.to_string()))?;

        row.try_into()
    }

    /// Explains a guarded write that matched no row.
    async fn unmatched_write(&self, id: &Uuid, expected: ReadingStatus) -> DomainError {
        let current: Result<Option<String>, sqlx::Error> =
            sqlx::query_scalar("SELECT status FROM pool_readings WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;

        match current {
            Ok(None) => DomainError::ReadingNotFound(id.to_string()),
            Ok(Some(raw)) => match ReadingStatus::from_str(&raw) {
                Some(actual) => {
                    warn!("Reading {} is {} now, expected {}; write skipped", id, actual, expected);
                    DomainError::StatusChanged { expected, actual }
                }
                None => DomainError::DatabaseError(format!("unknown status {:?} on {}", raw, id)),
            },
            Err(e) => db_error("re-reading reading status", e),
        }
    }
}

const SELECT_READING: &str = r#"
    SELECT
        r.id, r.reference_id, r.submission_date,
        r.ph_level, r.chlorine_ppm, r.alkalinity_ppm, r.temperature_celsius,
        r.water_clarity, r.notes, r.status,
        h.id AS hotel_id, h.name AS hotel_name, h.address AS hotel_address,
        h.phone AS hotel_phone, h.email AS hotel_email,
        h.created_at AS hotel_created_at,
        u.id AS submitter_id, u.username AS submitter_username
    FROM pool_readings r
    JOIN hotels h ON h.id = r.hotel_id
    JOIN users u ON u.id = r.submitted_by
"#;

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

#[derive(Debug, FromRow)]
struct ReadingRow {
    pub id: Uuid,
    pub reference_id: String,
    pub submission_date: DateTime<Utc>,
    pub ph_level: f64,
    pub chlorine_ppm: f64,
    pub alkalinity_ppm: i32,
    pub temperature_celsius: f64,
    pub water_clarity: String,
    pub notes: String,
    pub status: String,
    pub hotel_id: Uuid,
    pub hotel_name: String,
    pub hotel_address: Option<String>,
    pub hotel_phone: String,
    pub hotel_email: Option<String>,
    pub hotel_created_at: DateTime<Utc>,
    pub submitter_id: Uuid,
    pub submitter_username: String,
}

impl TryFrom<ReadingRow> for Reading {
    type Error = DomainError;

    fn try_from(row: ReadingRow) -> Result<Self, Self::Error> {
        let status = ReadingStatus::from_str(&row.status).ok_or_else(|| {
            DomainError::DatabaseError(format!("unknown status {:?} on {}", row.status, row.reference_id))
        })?;
        let water_clarity = WaterClarity::from_str(&row.water_clarity).ok_or_else(|| {
            DomainError::DatabaseError(format!(
                "unknown water clarity {:?} on {}",
                row.water_clarity, row.reference_id
            ))
        })?;

        Ok(Reading {
            id: row.id,
            reference_id: row.reference_id,
            hotel: Hotel {
                id: row.hotel_id,
                name: row.hotel_name,
                address: row.hotel_address,
                phone: row.hotel_phone,
                email: row.hotel_email,
                created_at: row.hotel_created_at,
            },
            submitted_by: Submitter {
                id: row.submitter_id,
                username: row.submitter_username,
            },
            submission_date: row.submission_date,
            measurements: Measurements {
                ph_level: row.ph_level,
                chlorine_ppm: row.chlorine_ppm,
                alkalinity_ppm: row.alkalinity_ppm,
                temperature_celsius: row.temperature_celsius,
                water_clarity,
                notes: row.notes,
            },
            status,
        })
    }
}

#[async_trait]
impl ReadingRepository for PgReadingRepository {
    async fn create(&self, reading: &NewReading) -> Result<Reading, DomainError> {
        let m = &reading.measurements;

        sqlx::query(
            r#"
            INSERT INTO pool_readings (
                id, reference_id, hotel_id, submitted_by, submission_date,
                ph_level, chlorine_ppm, alkalinity_ppm, temperature_celsius,
                water_clarity, notes, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(reading.id)
        .bind(&reading.reference_id)
        .bind(reading.hotel.id)
        .bind(reading.submitted_by.id)
        .bind(reading.submission_date)
        .bind(m.ph_level)
        .bind(m.chlorine_ppm)
        .bind(m.alkalinity_ppm)
        .bind(m.temperature_celsius)
        .bind(m.water_clarity.as_str())
        .bind(&m.notes)
        .bind(reading.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    warn!("Reference id collision: {}", reading.reference_id);
                    return DomainError::DuplicateReference(reading.reference_id.clone());
                }
            }
            db_error("creating reading", e)
        })?;

        info!("Reading stored: {}", reading.reference_id);
        self.fetch_by_id(&reading.id).await
    }

    async fn find_by_reference_id(&self, reference_id: &str) -> Result<Option<Reading>, DomainError> {
        let row: Option<ReadingRow> = sqlx::query_as(&format!("{SELECT_READING} WHERE r.reference_id = $1"))
            .bind(reference_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding reading by reference id", e))?;

        row.map(Reading::try_from).transpose()
    }

    async fn update_status(
        &self,
        id: &Uuid,
        expected: ReadingStatus,
        status: ReadingStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE pool_readings SET status = $3 WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(expected.as_str())
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("updating reading status", e))?;

        if result.rows_affected() == 0 {
            return Err(self.unmatched_write(id, expected).await);
        }
        Ok(())
    }

    async fn update_measurements(
        &self,
        id: &Uuid,
        expected: ReadingStatus,
        measurements: &Measurements,
        status: ReadingStatus,
    ) -> Result<Reading, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE pool_readings
            SET
                ph_level = $3,
                chlorine_ppm = $4,
                alkalinity_ppm = $5,
                temperature_celsius = $6,
                water_clarity = $7,
                notes = $8,
                status = $9
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(id)
        .bind(expected.as_str())
        .bind(measurements.ph_level)
        .bind(measurements.chlorine_ppm)
        .bind(measurements.alkalinity_ppm)
        .bind(measurements.temperature_celsius)
        .bind(measurements.water_clarity.as_str())
        .bind(&measurements.notes)
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("updating reading measurements", e))?;

        if result.rows_affected() == 0 {
            return Err(self.unmatched_write(id, expected).await);
        }
        self.fetch_by_id(id).await
    }

    async fn list(&self, filter: &ReadingFilter) -> Result<Vec<Reading>, DomainError> {
        let rows: Vec<ReadingRow> = sqlx::query_as(&format!(
            "{SELECT_READING} WHERE ($1::uuid IS NULL OR r.hotel_id = $1) ORDER BY r.submission_date DESC"
        ))
        .bind(filter.hotel_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing readings", e))?;

        rows.into_iter().map(Reading::try_from).collect()
    }
}
