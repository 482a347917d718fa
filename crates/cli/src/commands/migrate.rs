//! Database migration command.
//!
//! Creates the `documents` table from `crates/server/migrations/` and the
//! session table used by `tower-sessions`. The server never migrates on
//! startup.

use safar_server::middleware::postgres_session_store;

use super::{CliError, connect};

/// Run all migrations.
///
/// # Errors
///
/// Returns an error if the connection or any migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running document store migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Running session store migrations...");
    postgres_session_store(&pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
