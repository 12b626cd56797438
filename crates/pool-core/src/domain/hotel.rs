//! Hotel domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A hotel owning pools and staff. Provisioned outside the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Hotel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: None,
            phone: String::new(),
            email: None,
            created_at: Utc::now(),
        }
    }
}
