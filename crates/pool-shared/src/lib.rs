//! # Pool Shared
//! 
//! Shared configuration, telemetry, constants and localized messages for the
//! pool inspection workspace.

pub mod constants;
pub mod messages;
pub mod telemetry;
pub mod config;
pub mod error;

pub use error::AppError;
