//! User infrastructure module
//!
//! Password hashing with Argon2, in-memory and PostgreSQL repositories,
//! and the user service that ties them to cursor pagination.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
#[cfg(test)]
pub use password::MockPasswordHasher;
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{LoginOutcome, RegisterRequest, UpdateProfileRequest, UserPage, UserService};
