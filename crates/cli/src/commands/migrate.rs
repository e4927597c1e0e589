//! Database migration commands.
//!
//! Migration files live in `crates/storefront/migrations/` and are
//! embedded into the binary at compile time, so the CLI can run them
//! from anywhere with database access.

use tracing::info;

use super::{CommandError, connect};

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration
/// fails to apply.
pub async fn storefront() -> Result<(), CommandError> {
    info!("Connecting to storefront database...");
    let pool = connect().await?;

    info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    info!("Storefront migrations complete");
    Ok(())
}
