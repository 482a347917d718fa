//! Authorization extractors.
//!
//! The principal comes from the session under [`keys::PRINCIPAL`]; the
//! [`AdminGate`](crate::services::AdminGate) decides whether it is an admin.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::db::AdminEmailRepository;
use crate::error::AppError;
use crate::models::Principal;
use crate::models::session::keys;
use crate::services::{Authorization, DenyReason};
use crate::state::AppState;

/// Read the principal from the request's session.
///
/// A missing session layer or an unreadable session is `SessionUnavailable`.
async fn read_principal(parts: &Parts) -> Result<Option<Principal>, DenyReason> {
    let Some(session) = parts.extensions.get::<Session>() else {
        tracing::warn!("No session on request");
        return Err(DenyReason::SessionUnavailable);
    };

    session
        .get::<Principal>(keys::PRINCIPAL)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Failed to read session");
            DenyReason::SessionUnavailable
        })
}

/// Run the authorization gate for this request.
pub async fn authorize_request(parts: &Parts, state: &AppState) -> Authorization {
    match read_principal(parts).await {
        Ok(principal) => {
            let allowlist = AdminEmailRepository::new(state.store());
            state.gate().authorize(principal.as_ref(), &allowlist).await
        }
        Err(reason) => Authorization::Denied(reason),
    }
}

/// An admin that passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPrincipal {
    /// Normalized email, used for audit fields like `createdBy`.
    pub email: String,
}

/// Extractor that requires an admin.
///
/// Any denial becomes `401 {"error": "Unauthorized"}`; the reason is only
/// logged.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> String {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
pub struct RequireAdmin(pub AdminPrincipal);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authorize_request(parts, state).await {
            Authorization::Granted { email, via } => {
                // The email stays out of Sentry; only the grant source is tagged.
                sentry::configure_scope(|scope| scope.set_tag("admin_via", via.as_str()));
                tracing::debug!(via = via.as_str(), uri = %parts.uri, "Admin access granted");
                Ok(Self(AdminPrincipal { email }))
            }
            Authorization::Denied(reason) => {
                tracing::info!(
                    reason = ?reason,
                    method = %parts.method,
                    uri = %parts.uri,
                    "Admin access denied"
                );
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// Extractor that reports the gate's decision without rejecting.
pub struct Authorized(pub Authorization);

impl FromRequestParts<AppState> for Authorized {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(authorize_request(parts, state).await))
    }
}

/// Extractor that optionally gets the current principal.
///
/// Never rejects: no session or an unreadable session is `None`.
pub struct CurrentPrincipal(pub Option<Principal>);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(read_principal(parts).await.ok().flatten()))
    }
}

/// Helper to store the principal in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_principal(
    session: &Session,
    principal: &Principal,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::PRINCIPAL, principal).await
}
