//! Application state for shared services

use std::sync::Arc;

use crate::domain::pagination::PaginationError;
use crate::domain::user::{User, UserFilters, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::user::{
    LoginOutcome, PasswordHasher, RegisterRequest, UpdateProfileRequest, UserPage, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserServiceTrait>, jwt_service: Arc<dyn JwtGenerator>) -> Self {
        Self {
            user_service,
            jwt_service,
        }
    }
}

/// User operations reachable from HTTP handlers
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError>;
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<LoginOutcome>, DomainError>;
    async fn get_visible(&self, id: UserId) -> Result<Option<User>, DomainError>;
    async fn get_authenticated(&self, id: UserId) -> Result<Option<User>, DomainError>;
    async fn update_profile(
        &self,
        id: UserId,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError>;
    async fn soft_delete(&self, id: UserId) -> Result<User, DomainError>;
    async fn list_page(
        &self,
        cursor: Option<&str>,
        page_size: Option<usize>,
        filters: UserFilters,
    ) -> Result<UserPage, PaginationError>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<LoginOutcome>, DomainError> {
        UserService::authenticate(self, email, password).await
    }

    async fn get_visible(&self, id: UserId) -> Result<Option<User>, DomainError> {
        UserService::get_visible(self, id).await
    }

    async fn get_authenticated(&self, id: UserId) -> Result<Option<User>, DomainError> {
        UserService::get_authenticated(self, id).await
    }

    async fn update_profile(
        &self,
        id: UserId,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        UserService::update_profile(self, id, request).await
    }

    async fn soft_delete(&self, id: UserId) -> Result<User, DomainError> {
        UserService::soft_delete(self, id).await
    }

    async fn list_page(
        &self,
        cursor: Option<&str>,
        page_size: Option<usize>,
        filters: UserFilters,
    ) -> Result<UserPage, PaginationError> {
        UserService::list_page(self, cursor, page_size, filters).await
    }
}
