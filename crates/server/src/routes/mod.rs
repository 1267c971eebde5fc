//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness check
//! GET    /health/ready         - Readiness check (pings the store)
//!
//! # Customers
//! POST   /customer             - Register a customer
//! GET    /customer/{email}     - Fetch a customer
//! DELETE /customer/{email}     - Delete a customer (certificates are kept)
//!
//! # Certificates
//! POST   /certificate          - Issue a certificate to an existing customer
//! GET    /certificate/{email}  - List a customer's certificates
//! PUT    /certificate/{id}     - Set a certificate's `active` flag
//! ```

pub mod certificates;
pub mod customers;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;
use crate::store::Store;

/// Create the customer and certificate routes.
pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness::<S>))
        // Customers
        .route("/customer", post(customers::create::<S>))
        .route(
            "/customer/{email}",
            get(customers::show::<S>).delete(customers::delete::<S>),
        )
        // Certificates
        .route("/certificate", post(certificates::create::<S>))
        .route(
            "/certificate/{key}",
            get(certificates::list::<S>).put(certificates::update::<S>),
        )
}

/// Build the complete application with request tracing.
pub fn app<S: Store>(state: AppState<S>) -> Router {
    routes::<S>()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
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

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness<S: Store>(State(state): State<AppState<S>>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
