//! Public UI configuration.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Build the site-config router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/site-config", get(site_config))
}

/// Values the presentation layer needs for conditional rendering.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigResponse {
    pub superuser_email: Option<String>,
}

/// Expose the public superuser email.
pub async fn site_config(State(state): State<AppState>) -> Json<SiteConfigResponse> {
    Json(SiteConfigResponse {
        superuser_email: state.config().public_superuser_email.clone(),
    })
}
