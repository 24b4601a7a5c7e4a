//! Create-admin command - provisions an admin account

use std::sync::Arc;

use clap::Args;
use tracing::warn;

use crate::config::StorageBackend;
use crate::infrastructure::user::InMemoryUserRepository;
use crate::{build_user_service, create_postgres_repository};

#[derive(Debug, Args)]
pub struct CreateAdminArgs {
    /// Admin email; stored trimmed and lowercased
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

pub async fn run(args: CreateAdminArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();

    let created = match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Memory storage backend: the admin account is discarded when this command exits");

            build_user_service(Arc::new(InMemoryUserRepository::new()), &config)
                .create_admin(&args.email, &args.password)
                .await?
        }
        StorageBackend::Postgres => {
            build_user_service(Arc::new(create_postgres_repository(&config).await?), &config)
                .create_admin(&args.email, &args.password)
                .await?
        }
    };

    if created {
        println!("Admin user created.");
    } else {
        println!("Admin user already exists.");
    }

    Ok(())
}
