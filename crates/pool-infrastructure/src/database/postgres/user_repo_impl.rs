// ============================================================================
// Pool Infrastructure - PostgreSQL User Repository
// File: crates/pool-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{PgPool, FromRow};
use uuid::Uuid;
use tracing::error;
use chrono::{DateTime, Utc};

use pool_core::domain::{Hotel, User};
use pool_core::error::DomainError;
use pool_core::repositories::UserRepository;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_USER: &str = r#"
    SELECT
        u.id, u.username, u.password_hash, u.is_admin, u.created_at,
        h.id AS hotel_id, h.name AS hotel_name, h.address AS hotel_address,
        h.phone AS hotel_phone, h.email AS hotel_email,
        h.created_at AS hotel_created_at
    FROM users u
    LEFT JOIN hotels h ON h.id = u.hotel_id
"#;

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub hotel_id: Option<Uuid>,
    pub hotel_name: Option<String>,
    pub hotel_address: Option<String>,
    pub hotel_phone: Option<String>,
    pub hotel_email: Option<String>,
    pub hotel_created_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let hotel = match (row.hotel_id, row.hotel_name) {
            (Some(id), Some(name)) => Some(Hotel {
                id,
                name,
                address: row.hotel_address,
                phone: row.hotel_phone.unwrap_or_default(),
                email: row.hotel_email,
                created_at: row.hotel_created_at.unwrap_or(row.created_at),
            }),
            _ => None,
        };

        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            is_admin: row.is_admin,
            hotel,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error finding user by id: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE u.username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error finding user by username: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(row.map(|r| r.into()))
    }
}
