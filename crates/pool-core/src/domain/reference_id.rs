//! Reading reference ids: `{hotel_name}__{username}__{YYYYMMDD_HHMMSS}`.
//!
//! The format is a persisted contract. Consumers split it on the literal
//! double underscore, with the timestamp always last.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use pool_shared::constants::{REFERENCE_SEPARATOR, REFERENCE_TIMESTAMP_FORMAT};

static REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<hotel>.+)__(?P<user>.+)__(?P<ts>\d{8}_\d{6})$")
        .expect("reference id pattern is valid")
});

/// Builds the reference id for a reading submitted at `submitted_at`.
/// Second precision: two submissions by the same user for the same hotel in
/// one second yield the same id.
pub fn derive_reference_id(hotel_name: &str, username: &str, submitted_at: DateTime<Utc>) -> String {
    format!(
        "{hotel}{sep}{user}{sep}{ts}",
        hotel = hotel_name,
        user = username,
        sep = REFERENCE_SEPARATOR,
        ts = submitted_at.format(REFERENCE_TIMESTAMP_FORMAT),
    )
}

/// Components recovered from a reference id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceParts {
    pub hotel_name: String,
    pub username: String,
    pub submitted_at: DateTime<Utc>,
}

impl ReferenceParts {
    /// Hotel names containing `__` resolve greedily to the hotel part.
    pub fn parse(reference_id: &str) -> Option<Self> {
        let caps = REFERENCE_PATTERN.captures(reference_id)?;
        let naive = NaiveDateTime::parse_from_str(&caps["ts"], REFERENCE_TIMESTAMP_FORMAT).ok()?;
        Some(Self {
            hotel_name: caps["hotel"].to_string(),
            username: caps["user"].to_string(),
            submitted_at: Utc.from_utc_datetime(&naive),
        })
    }
}
