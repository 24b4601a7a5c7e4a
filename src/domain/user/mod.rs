//! User domain
//!
//! This module provides domain types and traits for user accounts,
//! including entities, validation, search filters, and repository traits.

mod entity;
mod filter;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserId};
pub use filter::UserFilters;
pub use repository::UserRepository;
pub use validation::{
    normalize_email, validate_email, validate_name, validate_password, validate_user_id,
    UserValidationError,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
