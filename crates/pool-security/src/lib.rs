//! # Pool Security
//! 
//! Security utilities: credential verification and server-held sessions.

pub mod password;
pub mod session;

pub use password::{CredentialVerifier, PasswordError, PasswordService};
pub use session::{SessionStore, SessionToken};
