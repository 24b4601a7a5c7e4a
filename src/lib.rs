//! User Directory API
//!
//! User accounts behind a REST API:
//! - Registration, login and self-service profile management
//! - Soft deletion with reactivation on login
//! - Admin listing with keyset pagination over `(created_at, id)`
//! - Opaque, HMAC-signed cursors bound to the request's filters

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use api::state::{AppState, UserServiceTrait};
use config::StorageBackend;
use domain::pagination::{CursorCodec, PageSizeLimits};
use domain::user::UserRepository;
use infrastructure::{
    auth::{JwtConfig, JwtGenerator, JwtService},
    storage::{connect_pool, run_storage_migrations, PostgresConfig},
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService},
};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state for the configured storage backend
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    info!("Storage backend: {:?}", config.storage.backend);

    let user_service: Arc<dyn UserServiceTrait> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(build_user_service(
            Arc::new(InMemoryUserRepository::new()),
            config,
        )),
        StorageBackend::Postgres => Arc::new(build_user_service(
            Arc::new(create_postgres_repository(config).await?),
            config,
        )),
    };

    Ok(AppState::new(user_service, create_jwt_service(config)))
}

/// Wire a user service over `repository` with the configured cursor secret and page limits
pub fn build_user_service<R: UserRepository>(
    repository: Arc<R>,
    config: &AppConfig,
) -> UserService<R, Argon2Hasher> {
    let cursor_secret = config.pagination.cursor_secret.clone().unwrap_or_else(|| {
        warn!(
            "No pagination cursor secret configured. Generating random secret. \
            Cursors will NOT survive a restart. Set APP__PAGINATION__CURSOR_SECRET."
        );
        generate_random_secret()
    });

    UserService::new(
        repository,
        Arc::new(Argon2Hasher::new()),
        CursorCodec::new(cursor_secret),
    )
    .with_page_limits(PageSizeLimits {
        default_page_size: config.pagination.default_page_size,
        max_page_size: config.pagination.max_page_size,
    })
}

/// Connect to PostgreSQL and apply migrations when enabled
pub async fn create_postgres_repository(
    config: &AppConfig,
) -> anyhow::Result<PostgresUserRepository> {
    let database_url = config.database_url().ok_or_else(|| {
        anyhow::anyhow!("database.url or DATABASE_URL is required for the postgres backend")
    })?;

    let pool = connect_pool(
        &PostgresConfig::new(database_url).with_max_connections(config.database.max_connections),
    )
    .await?;

    if config.database.run_migrations {
        run_storage_migrations(&pool).await?;
    }

    Ok(PostgresUserRepository::new(pool))
}

/// Create the JWT service from configuration, falling back to a random secret
fn create_jwt_service(config: &AppConfig) -> Arc<dyn JwtGenerator> {
    let jwt_secret = config
        .auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .unwrap_or_else(|| {
            warn!(
                "No JWT secret configured. Generating random secret. \
                Sessions will NOT persist across restarts. Set APP__AUTH__JWT_SECRET."
            );
            generate_random_secret()
        });

    Arc::new(JwtService::new(JwtConfig::new(
        jwt_secret,
        u64::from(config.auth.token_expiration_hours),
    )))
}

fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
