//! Application-wide constants

/// Seconds a dashboard listing stays valid for its owner.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 60;

pub const SESSION_COOKIE_NAME: &str = "pool_session";
pub const SESSION_TOKEN_BYTES: usize = 32;
/// Two weeks.
pub const DEFAULT_SESSION_MAX_AGE_SECONDS: u64 = 14 * 24 * 60 * 60;

/// Literal separator between the parts of a reading reference id.
pub const REFERENCE_SEPARATOR: &str = "__";
pub const REFERENCE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
