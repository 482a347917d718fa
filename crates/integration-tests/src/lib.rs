//! Integration tests for the Safar server.
//!
//! The real router runs in-process against the in-memory document store and
//! a `tower_sessions::MemoryStore`. Signing in writes a session carrying the
//! principal straight into that store, the way the identity service does in
//! production, and returns the matching cookie.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p safar-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};

use safar_server::config::{SiteConfig, StoreConfig};
use safar_server::db::{DocumentStore, MemoryDocumentStore};
use safar_server::middleware::{SESSION_COOKIE_NAME, create_session_layer, set_principal};
use safar_server::models::Principal;
use safar_server::routes::build_router;
use safar_server::state::AppState;

/// Superuser configured for every test app.
pub const SUPERUSER: &str = "owner@safar.test";

/// A running app plus handles on its backing stores.
pub struct TestApp {
    router: Router,
    sessions: MemoryStore,
    memory: MemoryDocumentStore,
    store: DocumentStore,
}

/// A response with its body parsed as JSON (or as a JSON string for text).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// App with [`SUPERUSER`] as the superuser.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SiteConfig {
            store: StoreConfig::Memory,
            superuser_email: Some(SUPERUSER.to_string()),
            public_superuser_email: Some(SUPERUSER.to_string()),
            ..SiteConfig::default()
        })
    }

    /// App with a custom configuration.
    #[must_use]
    pub fn with_config(config: SiteConfig) -> Self {
        let memory = MemoryDocumentStore::new();
        let store = DocumentStore::from(memory.clone());
        let sessions = MemoryStore::default();

        let layer = create_session_layer(sessions.clone(), &config);
        let router = build_router(AppState::new(config, store.clone()), layer);

        Self {
            router,
            sessions,
            memory,
            store,
        }
    }

    /// The document store behind the app.
    #[must_use]
    pub const fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Make every store operation fail until called again with `false`.
    pub fn set_store_unavailable(&self, unavailable: bool) {
        self.memory.set_unavailable(unavailable);
    }

    /// Create a session for `principal` and return its `Cookie` header value.
    pub async fn sign_in(&self, principal: &Principal) -> String {
        let session = Session::new(None, Arc::new(self.sessions.clone()), None);
        set_principal(&session, principal).await.unwrap();
        session.save().await.unwrap();

        format!("{SESSION_COOKIE_NAME}={}", session.id().unwrap())
    }

    /// Sign in as the configured superuser.
    pub async fn sign_in_superuser(&self) -> String {
        self.sign_in(&Principal::with_email(SUPERUSER)).await
    }

    /// Send a request and collect the response.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    /// `GET` without a session.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    /// `GET` as the holder of `cookie`.
    pub async fn get_as(&self, uri: &str, cookie: &str) -> TestResponse {
        self.send(Method::GET, uri, Some(cookie), None).await
    }

    /// `POST` a JSON body, optionally signed in.
    pub async fn post(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, cookie, Some(body)).await
    }

    /// `PUT` a JSON body, optionally signed in.
    pub async fn put(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, cookie, Some(body)).await
    }

    /// `DELETE`, optionally signed in.
    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, cookie, None).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
