//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness
//! GET  /health/ready                - Readiness (pings the store)
//!
//! # Catalog (same shape for /api/hotels and /api/flights)
//! GET    /api/packages[?id=]        - List active, or get one by id
//! POST   /api/packages              - Create (admin)
//! PUT    /api/packages?id=          - Merge update (admin)
//! DELETE /api/packages?id=          - Soft delete (admin)
//!
//! # Inquiries
//! GET  /api/inquiries[?id=][&status=] - List newest first, or get one (admin)
//! POST /api/inquiries               - Submit contact form (public)
//! PUT  /api/inquiries?id=           - Change status/notes (admin)
//!
//! # Contact info
//! GET  /api/contact-info            - Current settings or defaults
//! PUT  /api/contact-info            - Merge update (admin)
//!
//! # Admin
//! GET    /api/admin/is-admin        - {isAdmin}, never an error
//! GET    /api/admin/seed            - List allowlist (admin)
//! POST   /api/admin/seed            - Allow an email (admin)
//! DELETE /api/admin/seed[?email=]   - Revoke an email (admin)
//!
//! # Misc
//! POST /api/validate-email          - Email shape check
//! GET  /api/site-config             - Public UI configuration
//! ```

pub mod admin;
pub mod catalog;
pub mod contact_info;
pub mod health;
pub mod inquiries;
pub mod site_config;
pub mod validate_email;

use axum::Router;
use axum::http::Request;
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use safar_core::DocumentId;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Build every route, without layers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(catalog::router())
        .merge(inquiries::router())
        .merge(contact_info::router())
        .merge(admin::router())
        .merge(validate_email::router())
        .merge(site_config::router())
}

/// Build the application router with sessions, request ids, tracing and the
/// optional static fallback.
///
/// Sentry layers are added by the binary, outermost.
pub fn build_router<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let mut router = routes();

    if let Some(dir) = &state.config().static_dir {
        tracing::info!(dir = %dir.display(), "Serving presentation assets");
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(sessions)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// `?id=` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    /// The id, if one was given.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the id is malformed.
    pub fn optional(&self) -> Result<Option<DocumentId>, AppError> {
        optional_id(self.id.as_deref())
    }

    /// The id, which must be present.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest("Missing id")` if absent or blank.
    pub fn required(&self) -> Result<DocumentId, AppError> {
        self.optional()?
            .ok_or_else(|| AppError::BadRequest("Missing id".to_string()))
    }
}

/// Parse an optional id parameter; blank counts as absent.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the id is malformed.
pub fn optional_id(raw: Option<&str>) -> Result<Option<DocumentId>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => DocumentId::parse(raw)
            .map(Some)
            .map_err(|e| AppError::BadRequest(format!("Invalid id: {e}"))),
    }
}

/// Body of every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl MutationResponse {
    /// A success carrying the affected id.
    #[must_use]
    pub fn with_id(id: impl ToString) -> Self {
        Self {
            success: true,
            id: Some(id.to_string()),
        }
    }

    /// A success without an id.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            id: None,
        }
    }
}
