//! Admin console API handlers: the is-admin probe and the allowlist.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    routing::get,
};
use serde::Serialize;
use tracing::instrument;

use safar_core::Email;

use crate::{
    db::AdminEmailRepository,
    error::AppError,
    extract::{ApiJson, ApiQuery},
    middleware::{Authorized, RequireAdmin},
    models::{AdminEmailEntry, AdminEmailRequest, Record},
    state::AppState,
};

use super::MutationResponse;

/// Build the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/is-admin", get(is_admin))
        .route(
            "/api/admin/seed",
            get(list_admins).post(allow_admin).delete(revoke_admin),
        )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsAdminResponse {
    pub is_admin: bool,
}

/// Whether the caller is an admin. Always 200; the reason for a `false` is
/// only logged.
#[instrument(skip_all)]
pub async fn is_admin(Authorized(authorization): Authorized) -> Json<IsAdminResponse> {
    tracing::debug!(decision = ?authorization, "Admin probe");
    Json(IsAdminResponse {
        is_admin: authorization.is_granted(),
    })
}

fn parse_email(raw: Option<&str>) -> Result<Email, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing email".to_string()))?;
    Email::parse(raw).map_err(|_| AppError::BadRequest("Invalid email address".to_string()))
}

/// List allowlist entries, oldest first.
///
/// # Errors
///
/// Returns 401 for non-admins.
#[instrument(skip(state, _admin))]
pub async fn list_admins(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Record<AdminEmailEntry>>>, AppError> {
    Ok(Json(AdminEmailRepository::new(state.store()).list().await?))
}

/// Grant admin rights to `{email}`. Re-adding an email refreshes its entry.
///
/// # Errors
///
/// Returns 401 for non-admins, 400 for a missing or invalid email.
#[instrument(skip(state, admin, request))]
pub async fn allow_admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(request): ApiJson<AdminEmailRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let email = parse_email(request.email.as_deref())?;

    AdminEmailRepository::new(state.store())
        .allow(&email, &admin.email)
        .await?;
    tracing::info!(email = %email, by = %admin.email, "Admin email allowed");

    Ok(Json(MutationResponse::with_id(email)))
}

/// Revoke admin rights. The email comes from `?email=` or a `{email}` body.
///
/// Revoking an email that is not on the allowlist succeeds.
///
/// # Errors
///
/// Returns 401 for non-admins, 400 for a missing or invalid email.
#[instrument(skip(state, admin, query, body))]
pub async fn revoke_admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiQuery(query): ApiQuery<AdminEmailRequest>,
    body: Bytes,
) -> Result<Json<MutationResponse>, AppError> {
    let from_body = || {
        serde_json::from_slice::<AdminEmailRequest>(&body)
            .ok()
            .and_then(|req| req.email)
    };
    let raw = query.email.filter(|s| !s.trim().is_empty()).or_else(from_body);
    let email = parse_email(raw.as_deref())?;

    let existed = AdminEmailRepository::new(state.store())
        .revoke(&email)
        .await?;
    tracing::info!(email = %email, existed, by = %admin.email, "Admin email revoked");

    Ok(Json(MutationResponse::with_id(email)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_email() {
        assert_eq!(
            parse_email(Some("  Ops@Example.COM ")).unwrap().as_str(),
            "ops@example.com"
        );
        assert!(matches!(parse_email(None), Err(AppError::BadRequest(m)) if m == "Missing email"));
        assert!(matches!(parse_email(Some(" ")), Err(AppError::BadRequest(m)) if m == "Missing email"));
        assert!(matches!(
            parse_email(Some("nope")),
            Err(AppError::BadRequest(m)) if m == "Invalid email address"
        ));
    }
}
