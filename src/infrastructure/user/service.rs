//! User service for registration, authentication and profile management

use std::sync::Arc;

use tracing::info;

use crate::domain::pagination::{CursorCodec, CursorPaginator, Page, PageSizeLimits, PaginationError};
use crate::domain::user::{
    normalize_email, validate_email, validate_name, validate_password, NewUser, User,
    UserFilters, UserId, UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Partial profile update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    /// The account was soft-deleted and has been restored by this login
    pub reactivated: bool,
}

/// A page of users together with the page size that produced it
#[derive(Debug, Clone)]
pub struct UserPage {
    pub page: Page<User>,
    pub limit: usize,
}

/// User service for authentication and management
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    paginator: CursorPaginator<R>,
}

impl<R: UserRepository, H: PasswordHasher> std::fmt::Debug for UserService<R, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("repository", &self.repository)
            .field("hasher", &self.hasher)
            .field("paginator", &self.paginator)
            .finish()
    }
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>, cursor_codec: CursorCodec) -> Self {
        let paginator = CursorPaginator::new(repository.clone(), cursor_codec);

        Self {
            repository,
            hasher,
            paginator,
        }
    }

    /// Override the default page size bounds
    pub fn with_page_limits(mut self, limits: PageSizeLimits) -> Self {
        self.paginator = self.paginator.with_limits(limits);
        self
    }

    /// Register a regular (non-admin) account
    pub async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_name("First name", &request.first_name, false)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_name("Last name", &request.last_name, false)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let email = normalize_email(&request.email);

        if self.repository.email_exists(&email).await? {
            return Err(DomainError::conflict("User already exists."));
        }

        let user = self
            .repository
            .create(NewUser {
                email,
                password_hash: self.hasher.hash(&request.password)?,
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                is_admin: false,
                is_active: true,
            })
            .await?;

        info!(user_id = %user.id(), "User registered");
        Ok(user)
    }

    /// Check credentials; a soft-deleted account is restored on successful login.
    ///
    /// Returns `None` for unknown emails, wrong passwords and inactive accounts.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<LoginOutcome>, DomainError> {
        let email = normalize_email(email);

        let Some(mut user) = self.repository.get_by_email(&email).await? else {
            return Ok(None);
        };

        if !self.hasher.verify(password, user.password_hash()) || !user.is_active() {
            return Ok(None);
        }

        let reactivated = user.restore_deleted();
        if reactivated {
            user = self.repository.update(&user).await?;
            info!(user_id = %user.id(), "Soft-deleted user reactivated on login");
        }

        Ok(Some(LoginOutcome { user, reactivated }))
    }

    /// Get a user by ID, including soft-deleted ones
    pub async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// Get a user that has not been soft-deleted
    pub async fn get_visible(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.repository.get(id).await?.filter(|u| !u.is_deleted()))
    }

    /// Get a user that may act on its own behalf (active and not deleted)
    pub async fn get_authenticated(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.repository.get(id).await?.filter(User::can_authenticate))
    }

    async fn require_authenticated(&self, id: UserId) -> Result<User, DomainError> {
        self.get_authenticated(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    /// Apply a partial profile update
    pub async fn update_profile(
        &self,
        id: UserId,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let mut user = self.require_authenticated(id).await?;

        if let Some(email) = request.email {
            validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;
            let email = normalize_email(&email);

            if email != user.email() {
                if self.repository.email_exists(&email).await? {
                    return Err(DomainError::conflict("User already exists."));
                }
                user.set_email(email);
            }
        }

        if let Some(first_name) = request.first_name {
            validate_name("First name", &first_name, true)
                .map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_first_name(first_name.trim());
        }

        if let Some(last_name) = request.last_name {
            validate_name("Last name", &last_name, true)
                .map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_last_name(last_name.trim());
        }

        if let Some(password) = request.password {
            validate_password(&password).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_password_hash(self.hasher.hash(&password)?);
        }

        self.repository.update(&user).await
    }

    /// Soft-delete an account; it drops out of every listing
    pub async fn soft_delete(&self, id: UserId) -> Result<User, DomainError> {
        let mut user = self.require_authenticated(id).await?;
        user.soft_delete();

        let user = self.repository.update(&user).await?;
        info!(user_id = %user.id(), "User soft-deleted");

        Ok(user)
    }

    /// Fetch one page of live users
    pub async fn list_page(
        &self,
        cursor: Option<&str>,
        page_size: Option<usize>,
        filters: UserFilters,
    ) -> Result<UserPage, PaginationError> {
        let limit = self.paginator.resolve_page_size(page_size)?;
        let page = self.paginator.fetch_page(cursor, limit, filters).await?;

        Ok(UserPage { page, limit })
    }

    /// Create an admin account; returns false when the email is already taken
    pub async fn create_admin(&self, email: &str, password: &str) -> Result<bool, DomainError> {
        validate_email(email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(password).map_err(|e| DomainError::validation(e.to_string()))?;

        let email = normalize_email(email);

        if self.repository.email_exists(&email).await? {
            return Ok(false);
        }

        let user = self
            .repository
            .create(NewUser {
                email,
                password_hash: self.hasher.hash(password)?,
                first_name: String::new(),
                last_name: String::new(),
                is_admin: true,
                is_active: true,
            })
            .await?;

        info!(user_id = %user.id(), "Admin user created");
        Ok(true)
    }
}
