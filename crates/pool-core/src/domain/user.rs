//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hotel::Hotel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,

    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub is_admin: bool,

    /// Resolved owning hotel; `None` for unassigned staff.
    pub hotel: Option<Hotel>,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, hotel: Option<Hotel>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            is_admin: false,
            hotel,
            created_at: Utc::now(),
        }
    }

    pub fn admin(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::new(username, password_hash, None)
        }
    }

    pub fn hotel_id(&self) -> Option<Uuid> {
        self.hotel.as_ref().map(|h| h.id)
    }

    /// Whether this user may see readings owned by `hotel_id`.
    pub fn can_access_hotel(&self, hotel_id: Uuid) -> bool {
        self.is_admin || self.hotel_id() == Some(hotel_id)
    }

    pub fn role_label(&self) -> &'static str {
        if self.is_admin {
            "Yönetici"
        } else {
            "Kullanıcı"
        }
    }
}

/// The part of a user a reading keeps about its submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for Submitter {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
