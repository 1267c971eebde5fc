//! Integration tests for certdesk.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no database needed)
//! cargo test -p certdesk-integration-tests
//!
//! # Live tests against a running server
//! cargo run -p certdesk-cli -- migrate
//! cargo run -p certdesk-server &
//! cargo test -p certdesk-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `customer_lifecycle` / `certificate_lifecycle` - Full router over the in-memory store
//! - `live_api` - The same flows over HTTP against `CERTDESK_BASE_URL`

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use certdesk_server::{AppState, MemoryStore, app};
use serde_json::Value;
use tower::ServiceExt;

/// Base URL of a running server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CERTDESK_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// An email no other test run will have registered.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@certdesk.test", uuid::Uuid::new_v4().simple())
}

/// A response with its body read to a string.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }
}

/// The full application router backed by an in-memory store.
#[derive(Clone)]
pub struct TestApp {
    pub store: MemoryStore,
    router: Router,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let router = app(AppState::new(store.clone()));
        Self { store, router }
    }

    /// Send one request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn request(&self, method: Method, uri: &str, body: Option<&Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        TestResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }
}
