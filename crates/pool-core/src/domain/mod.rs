//! # Pool Core - Domain Module
//! 
//! Domain entities for the pool inspection application.

pub mod user;
pub mod hotel;
pub mod reading;
pub mod reading_status;
pub mod water_clarity;
pub mod reference_id;
pub mod reading_data;

// Re-export all entities and enums
pub use user::{User, Submitter};
pub use hotel::Hotel;
pub use reading::{Reading, NewReading, Measurements, ReadingFilter};
pub use reading_status::ReadingStatus;
pub use water_clarity::WaterClarity;
pub use reference_id::{derive_reference_id, ReferenceParts};
pub use reading_data::ReadingData;
