//! Inquiry API handlers.
//!
//! Submitting is public (the contact form); reading and updating are admin-only.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use safar_core::InquiryStatus;

use crate::{
    db::{InquiryRepository, RepositoryError},
    error::AppError,
    extract::{ApiJson, ApiQuery},
    middleware::{CurrentPrincipal, RequireAdmin},
    models::{InquiryPatch, NewInquiry},
    state::AppState,
};

use super::{IdQuery, MutationResponse, optional_id};

/// Build the inquiries router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/inquiries",
        get(list_or_get).post(create).put(update),
    )
}

/// `GET /api/inquiries` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct InquiryQuery {
    pub id: Option<String>,
    pub status: Option<String>,
}

impl InquiryQuery {
    fn status(&self) -> Result<Option<InquiryStatus>, AppError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| AppError::BadRequest(format!("Invalid status: {raw}"))),
        }
    }
}

fn not_found(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("Inquiry not found".to_string()),
        other => AppError::Repository(other),
    }
}

/// List inquiries newest first (optionally by `?status=`), or get one by `?id=`.
///
/// # Errors
///
/// Returns 401 for non-admins, 400 for an unknown status, 404 for an unknown id.
#[instrument(skip(state, _admin))]
pub async fn list_or_get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiQuery(query): ApiQuery<InquiryQuery>,
) -> Result<Response, AppError> {
    let repo = InquiryRepository::new(state.store());
    if let Some(id) = optional_id(query.id.as_deref())? {
        let record = repo
            .get(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("Inquiry not found".to_string()))?;
        return Ok(Json(record).into_response());
    }

    let status = query.status()?;
    Ok(Json(repo.list(status).await?).into_response())
}

/// Submit the contact form. Always stored as `pending`.
///
/// # Errors
///
/// Returns 400 if the submission is invalid.
#[instrument(skip(state, principal, submission))]
pub async fn create(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    ApiJson(submission): ApiJson<NewInquiry>,
) -> Result<Json<MutationResponse>, AppError> {
    let inquiry = submission.into_inquiry()?;

    let id = InquiryRepository::new(state.store()).create(inquiry).await?;
    tracing::info!(id = %id, signed_in = principal.is_some(), "Inquiry received");

    Ok(Json(MutationResponse::with_id(id)))
}

/// Change the status and/or notes of the inquiry named by `?id=`.
///
/// # Errors
///
/// Returns 401 for non-admins, 400 for a missing id, an unknown status or an
/// empty patch, 404 for an unknown id.
#[instrument(skip(state, admin, patch))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiQuery(query): ApiQuery<IdQuery>,
    ApiJson(patch): ApiJson<InquiryPatch>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = query.required()?;
    if patch.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    InquiryRepository::new(state.store())
        .update(&id, &patch)
        .await
        .map_err(not_found)?;
    tracing::info!(id = %id, status = ?patch.status, by = %admin.email, "Inquiry updated");

    Ok(Json(MutationResponse::with_id(id)))
}
