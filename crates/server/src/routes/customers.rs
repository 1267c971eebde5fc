//! Customer route handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::instrument;

use certdesk_core::{Customer, NewCustomer};

use crate::error::Result;
use crate::state::AppState;
use crate::store::Store;

/// Register a customer.
///
/// POST /customer
///
/// # Errors
///
/// 400 if the email is already registered or the body is malformed,
/// 500 if the store fails.
#[instrument(skip(state, payload))]
pub async fn create<S: Store>(
    State(state): State<AppState<S>>,
    payload: std::result::Result<Json<NewCustomer>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>)> {
    let Json(new) = payload?;
    let customer = state.customers().create(new).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Fetch a customer by email.
///
/// GET /customer/{email}
///
/// # Errors
///
/// 404 if no customer has this email.
#[instrument(skip(state))]
pub async fn show<S: Store>(
    State(state): State<AppState<S>>,
    Path(email): Path<String>,
) -> Result<Json<Customer>> {
    Ok(Json(state.customers().get(&email).await?))
}

/// Delete a customer by email.
///
/// DELETE /customer/{email}
///
/// # Errors
///
/// 404 if no customer has this email.
#[instrument(skip(state))]
pub async fn delete<S: Store>(
    State(state): State<AppState<S>>,
    Path(email): Path<String>,
) -> Result<StatusCode> {
    state.customers().delete(&email).await?;
    Ok(StatusCode::OK)
}
