//! PostgreSQL repository implementations

pub mod user_repo_impl;
pub mod reading_repo_impl;

pub use user_repo_impl::PgUserRepository;
pub use reading_repo_impl::PgReadingRepository;
