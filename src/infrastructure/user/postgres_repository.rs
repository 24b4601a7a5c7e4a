//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::domain::pagination::{PageQuery, PageSource};
use crate::domain::user::{NewUser, User, UserFilters, UserId, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, is_admin, \
                            is_active, created_at, updated_at, deleted_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build the keyset page statement for a query descriptor
fn build_page_query(query: &PageQuery<UserFilters>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT {} FROM users WHERE deleted_at IS NULL",
        USER_COLUMNS
    ));

    if let Some(after) = query.after {
        builder
            .push(" AND (created_at > ")
            .push_bind(after.created_at)
            .push(" OR (created_at = ")
            .push_bind(after.created_at)
            .push(" AND id > ")
            .push_bind(after.id)
            .push("))");
    }

    if let Some(search) = query.filters.search_string() {
        let operator = if query.filters.search_ignore_case() {
            "ILIKE"
        } else {
            "LIKE"
        };

        builder
            .push(format!(" AND email {} ", operator))
            .push_bind(format!("%{}%", escape_like(search)))
            .push(" ESCAPE '\\'");
    }

    builder
        .push(" ORDER BY created_at ASC, id ASC LIMIT ")
        .push_bind(query.limit as i64);

    builder
}

/// Escape LIKE wildcards so the search is a literal substring match
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

fn map_write_error(e: sqlx::Error, action: &str) -> DomainError {
    let unique_violation = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());

    if unique_violation {
        DomainError::conflict("User already exists.")
    } else {
        DomainError::storage(format!("Failed to {} user: {}", action, e))
    }
}

#[async_trait]
impl PageSource for PostgresUserRepository {
    type Row = User;
    type Filters = UserFilters;

    async fn fetch_page_rows(
        &self,
        query: &PageQuery<UserFilters>,
    ) -> Result<Vec<User>, DomainError> {
        let mut builder = build_page_query(query);
        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, is_admin, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_admin)
        .bind(user.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "create"))?;

        row_to_user(&row)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, password_hash = $3, first_name = $4, last_name = $5,
                is_admin = $6, is_active = $7, updated_at = $8, deleted_at = $9
            WHERE id = $1
            "#,
        )
        .bind(user.id().value())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.is_admin())
        .bind(user.is_active())
        .bind(user.updated_at())
        .bind(user.deleted_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User '{}' not found", user.id())));
        }

        Ok(user.clone())
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: i64 = row.get("id");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");
    let deleted_at: Option<DateTime<Utc>> = row.get("deleted_at");

    let user_id = UserId::new(id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(User::restore(
        user_id,
        row.get("email"),
        row.get("password_hash"),
        row.get("first_name"),
        row.get("last_name"),
        row.get("is_admin"),
        row.get("is_active"),
        created_at,
        updated_at,
        deleted_at,
    ))
}
