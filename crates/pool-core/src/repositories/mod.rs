//! Repository traits (ports)

pub mod user_repository;
pub mod reading_repository;

pub use user_repository::UserRepository;
pub use reading_repository::ReadingRepository;

#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use reading_repository::MockReadingRepository;
