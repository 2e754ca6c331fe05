//! Seed command - Initial data creation.

use crate::cli::args::{SeedArgs, SeedTarget};
use crate::config::{Config, ROLE_ADMIN};
use crate::domain::Password;
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{UserRepository, UserStore};
use crate::infra::Database;

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.target {
        SeedTarget::Admin {
            email,
            name,
            password,
        } => seed_admin(&db, email, name, password).await,
    }
}

/// Create the initial admin account. Idempotent: an existing account
/// with the same email is left untouched.
async fn seed_admin(db: &Database, email: String, name: String, password: String) -> AppResult<()> {
    let users = UserStore::new(db.get_connection());

    if users.find_by_email(&email).await?.is_some() {
        tracing::info!(%email, "Admin account already exists, nothing to do");
        return Ok(());
    }

    let hash = Password::new(&password)?;
    let user = users
        .create(email, hash.into_string(), name, ROLE_ADMIN.to_string())
        .await?;

    tracing::info!(%user.email, "Admin account created");
    Ok(())
}
