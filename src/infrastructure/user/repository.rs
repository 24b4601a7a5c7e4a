//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::pagination::{PageQuery, PageRow, PageSource};
use crate::domain::user::{NewUser, User, UserFilters, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    /// email -> user id
    email_index: HashMap<String, i64>,
    last_id: i64,
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with pre-built users (ids and timestamps kept as given)
    pub fn with_users(users: Vec<User>) -> Self {
        let mut tables = Tables::default();

        for user in users {
            let id = user.id().value();
            tables.last_id = tables.last_id.max(id);
            tables.email_index.insert(user.email().to_string(), id);
            tables.users.insert(id, user);
        }

        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

#[async_trait]
impl PageSource for InMemoryUserRepository {
    type Row = User;
    type Filters = UserFilters;

    async fn fetch_page_rows(
        &self,
        query: &PageQuery<UserFilters>,
    ) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.read().await;

        let mut rows: Vec<User> = tables
            .users
            .values()
            .filter(|u| !u.is_deleted())
            .filter(|u| query.filters.matches(u))
            .filter(|u| query.is_after(&u.position()))
            .cloned()
            .collect();

        rows.sort_by_key(PageRow::position);
        rows.truncate(query.limit);

        Ok(rows)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id.value()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .email_index
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.email_index.contains_key(&user.email) {
            return Err(DomainError::conflict("User already exists."));
        }

        let next_id = tables.last_id + 1;
        let id = UserId::new(next_id).map_err(|e| DomainError::internal(e.to_string()))?;
        let created = User::from_new(id, user, Utc::now());

        tables.last_id = next_id;
        tables.email_index.insert(created.email().to_string(), next_id);
        tables.users.insert(next_id, created.clone());

        Ok(created)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        let id = user.id().value();

        let old_email = match tables.users.get(&id) {
            Some(existing) => existing.email().to_string(),
            None => return Err(DomainError::not_found(format!("User '{}' not found", id))),
        };

        if old_email != user.email() {
            if tables.email_index.contains_key(user.email()) {
                return Err(DomainError::conflict("User already exists."));
            }

            tables.email_index.remove(&old_email);
            tables.email_index.insert(user.email().to_string(), id);
        }

        tables.users.insert(id, user.clone());
        Ok(user.clone())
    }
}
