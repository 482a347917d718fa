//! Contact-info API handlers.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use crate::{
    db::ContactInfoRepository,
    error::AppError,
    extract::ApiJson,
    middleware::RequireAdmin,
    models::{ContactInfo, ContactInfoPatch, Validate},
    state::AppState,
};

use super::MutationResponse;

/// Build the contact-info router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/contact-info", get(show).put(update))
}

/// Current contact info, or the defaults if none has been saved.
///
/// # Errors
///
/// Returns 500 if the store cannot be read.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<ContactInfo>, AppError> {
    Ok(Json(ContactInfoRepository::new(state.store()).get().await?))
}

/// Merge the provided fields into the contact info.
///
/// # Errors
///
/// Returns 401 for non-admins, 400 for invalid fields.
#[instrument(skip(state, admin, patch))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(patch): ApiJson<ContactInfoPatch>,
) -> Result<Json<MutationResponse>, AppError> {
    patch.validate()?;

    ContactInfoRepository::new(state.store()).update(&patch).await?;
    tracing::info!(by = %admin.email, "Contact info updated");

    Ok(Json(MutationResponse::ok()))
}
