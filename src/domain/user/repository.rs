//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId};
use super::filter::UserFilters;
use crate::domain::pagination::PageSource;
use crate::domain::DomainError;

/// Repository trait for user storage.
///
/// Lookups return soft-deleted users too; only page queries hide them.
#[async_trait]
pub trait UserRepository:
    PageSource<Row = User, Filters = UserFilters> + Send + Sync + Debug
{
    /// Get a user by ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by normalized email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Insert a user, assigning its id and timestamps
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Persist changes to an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Check if an email is taken (deleted accounts included)
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
