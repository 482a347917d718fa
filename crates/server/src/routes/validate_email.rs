//! Email shape check used by the sign-up and contact forms.

use axum::{
    Json, Router,
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use serde_json::json;

use safar_core::Email;

use crate::state::AppState;

/// Build the validate-email router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/validate-email", post(validate_email))
}

#[derive(Debug, Deserialize)]
struct ValidateEmailRequest {
    email: Option<String>,
}

/// `200 {"valid": true}` for a well-formed email, otherwise
/// `400 {"message": "Invalid email address"}`.
///
/// Malformed or missing bodies get the same 400.
pub async fn validate_email(body: Bytes) -> Response {
    let email = serde_json::from_slice::<ValidateEmailRequest>(&body)
        .ok()
        .and_then(|req| req.email);

    match email.as_deref().map(Email::parse) {
        Some(Ok(_)) => Json(json!({ "valid": true })).into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Invalid email address" })),
        )
            .into_response(),
    }
}
