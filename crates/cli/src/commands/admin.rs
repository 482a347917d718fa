//! Admin allowlist commands.
//!
//! Used to bootstrap delegated admins before anyone can reach the console.

use safar_core::Email;
use safar_server::db::{AdminEmailRepository, DocumentStore};

use super::{CliError, connect};

async fn store() -> Result<DocumentStore, CliError> {
    Ok(DocumentStore::postgres(connect().await?))
}

/// Add an email to the allowlist, or refresh its entry.
///
/// # Errors
///
/// Returns an error if the email is invalid or the write fails.
pub async fn allow(email: &str, by: &str) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    let store = store().await?;

    AdminEmailRepository::new(&store).allow(&email, by).await?;

    tracing::info!(email = %email, by, "Admin email allowed");
    Ok(())
}

/// Remove an email from the allowlist.
///
/// # Errors
///
/// Returns an error if the email is invalid or the delete fails.
pub async fn revoke(email: &str) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    let store = store().await?;

    if AdminEmailRepository::new(&store).revoke(&email).await? {
        tracing::info!(email = %email, "Admin email revoked");
    } else {
        tracing::warn!(email = %email, "Email was not on the allowlist");
    }
    Ok(())
}

/// Print the allowlist.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list() -> Result<(), CliError> {
    let store = store().await?;
    let entries = AdminEmailRepository::new(&store).list().await?;

    tracing::info!("{} allowlisted emails", entries.len());
    for entry in entries {
        tracing::info!(
            "  {} (added by {} at {})",
            entry.data.email,
            entry.data.created_by,
            entry.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}
