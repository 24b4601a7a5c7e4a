//! Storage infrastructure - PostgreSQL pooling and schema migrations

pub mod migrations;
mod postgres;

pub use migrations::{run_storage_migrations, Migration, PostgresMigrator, MIGRATIONS};
pub use postgres::{connect_pool, PostgresConfig};
