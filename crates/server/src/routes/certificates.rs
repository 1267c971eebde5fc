//! Certificate route handlers.
//!
//! `GET` and `PUT` share the `/certificate/{key}` path: the segment is a
//! customer email for `GET` and a certificate id for `PUT`.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::instrument;

use certdesk_core::{ActiveUpdate, Certificate, CertificateId, NewCertificate};

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::Store;

/// Issue a certificate to an existing customer.
///
/// POST /certificate
///
/// # Errors
///
/// 404 if the customer does not exist, 400 if the body is malformed,
/// 500 if the store fails.
#[instrument(skip(state, payload))]
pub async fn create<S: Store>(
    State(state): State<AppState<S>>,
    payload: std::result::Result<Json<NewCertificate>, JsonRejection>,
) -> Result<(StatusCode, Json<Certificate>)> {
    let Json(new) = payload?;
    let certificate = state.certificates().create(new).await?;
    Ok((StatusCode::CREATED, Json(certificate)))
}

/// List every certificate issued to a customer.
///
/// GET /certificate/{email}
///
/// # Errors
///
/// 404 if the customer does not exist, 500 if the store fails.
#[instrument(skip(state))]
pub async fn list<S: Store>(
    State(state): State<AppState<S>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Certificate>>> {
    Ok(Json(state.certificates().list_by_customer(&email).await?))
}

/// Set a certificate's `active` flag.
///
/// PUT /certificate/{id}
///
/// # Errors
///
/// 404 for a malformed id (whatever the body), an unknown id, or a store
/// failure. 400 if the id is well-formed but the body is malformed or carries
/// fields other than `active`.
#[instrument(skip(state, payload))]
pub async fn update<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ActiveUpdate>, JsonRejection>,
) -> Result<(StatusCode, &'static str)> {
    let id = CertificateId::parse(&id).map_err(|e| AppError::UpdateFailed(e.into()))?;
    let Json(update) = payload?;

    state
        .certificates()
        .set_active(id, update)
        .await
        .map_err(AppError::UpdateFailed)?;

    Ok((StatusCode::OK, "Successfully updated certificate."))
}
