//! # Pool Core
//! 
//! Domain entities, services, and repository traits for the pool inspection
//! workflow: authentication and sessions, reading submission with its status
//! lifecycle, and the dashboard listing cache.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, ErrorKind};
