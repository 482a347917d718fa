//! Catalog API handlers for packages, hotels and flights.
//!
//! The three collections share these generic handlers, instantiated per
//! record type.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::instrument;

use crate::{
    db::{CatalogRepository, RepositoryError},
    error::AppError,
    extract::{ApiJson, ApiQuery},
    middleware::RequireAdmin,
    models::{CatalogItem, Flight, Hotel, Package, Validate},
    state::AppState,
};

use super::{IdQuery, MutationResponse};

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(collection::<Package>("/api/packages"))
        .merge(collection::<Hotel>("/api/hotels"))
        .merge(collection::<Flight>("/api/flights"))
}

fn collection<T: CatalogItem>(path: &str) -> Router<AppState> {
    Router::new().route(
        path,
        get(list_or_get::<T>)
            .post(create::<T>)
            .put(update::<T>)
            .delete(soft_delete::<T>),
    )
}

fn not_found<T: CatalogItem>(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound(format!("{} not found", T::LABEL)),
        other => AppError::Repository(other),
    }
}

/// List active records, or get one record (active or not) by `?id=`.
///
/// # Errors
///
/// Returns 404 if the id is unknown, 500 if the store fails.
#[instrument(skip(state))]
pub async fn list_or_get<T: CatalogItem>(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Response, AppError> {
    let repo = CatalogRepository::<T>::new(state.store());

    match query.optional()? {
        Some(id) => {
            let record = repo
                .get(&id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("{} not found", T::LABEL)))?;
            Ok(Json(record).into_response())
        }
        None => Ok(Json(repo.list_active().await?).into_response()),
    }
}

/// Create a record. It is stored active regardless of the payload.
///
/// # Errors
///
/// Returns 401 for non-admins, 400 for invalid payloads.
#[instrument(skip(state, admin, item))]
pub async fn create<T: CatalogItem>(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(item): ApiJson<T>,
) -> Result<Json<MutationResponse>, AppError> {
    item.validate()?;

    let id = CatalogRepository::<T>::new(state.store()).create(item).await?;
    tracing::info!(collection = T::COLLECTION, id = %id, by = %admin.email, "Record created");

    Ok(Json(MutationResponse::with_id(id)))
}

/// Merge the provided fields into the record named by `?id=`.
///
/// # Errors
///
/// Returns 401 for non-admins, 400 for a missing id or invalid payload,
/// 404 if the id is unknown.
#[instrument(skip(state, admin, patch))]
pub async fn update<T: CatalogItem>(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiQuery(query): ApiQuery<IdQuery>,
    ApiJson(patch): ApiJson<T::Patch>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = query.required()?;
    patch.validate()?;

    let repo = CatalogRepository::<T>::new(state.store());
    // Cross-field rules see the stored record with the patch applied.
    repo.merged(&id, &patch)
        .await
        .map_err(not_found::<T>)?
        .validate()?;
    repo.update(&id, &patch).await.map_err(not_found::<T>)?;
    tracing::info!(collection = T::COLLECTION, id = %id, by = %admin.email, "Record updated");

    Ok(Json(MutationResponse::with_id(id)))
}

/// Soft-delete the record named by `?id=`.
///
/// # Errors
///
/// Returns 401 for non-admins, 400 for a missing id, 404 if the id is unknown.
#[instrument(skip(state, admin))]
pub async fn soft_delete<T: CatalogItem>(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = query.required()?;

    CatalogRepository::<T>::new(state.store())
        .soft_delete(&id)
        .await
        .map_err(not_found::<T>)?;
    tracing::info!(collection = T::COLLECTION, id = %id, by = %admin.email, "Record deactivated");

    Ok(Json(MutationResponse::with_id(id)))
}
