//! Domain services (business logic)

pub mod clock;
pub mod auth_service;
pub mod reading_service;
pub mod dashboard_cache;
pub mod dashboard_service;

pub use clock::{Clock, SystemClock};
pub use auth_service::{AuthFailure, AuthOutcome, AuthService, LoginResult};
pub use reading_service::{ReadingService, ReadingView, SubmissionOutcome};
pub use dashboard_cache::DashboardCache;
pub use dashboard_service::{DashboardService, SubmissionRow};
