//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (`http_request` span)
//! 3. Request ID (recorded on the span, Sentry scope and response)
//! 4. Session layer (tower-sessions)
//!
//! Authorization is not a layer: handlers opt in with [`RequireAdmin`].

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{
    AdminPrincipal, Authorized, CurrentPrincipal, RequireAdmin, authorize_request, set_principal,
};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer, postgres_session_store};
