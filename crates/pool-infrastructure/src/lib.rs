//! # Pool Infrastructure
//! 
//! Record store implementations (adapters): PostgreSQL via sqlx, and an
//! in-memory store with the same constraints for tests and local runs.

pub mod database;
pub mod memory;

pub use database::{create_pool, run_migrations, PgReadingRepository, PgUserRepository};
pub use memory::MemoryStore;
