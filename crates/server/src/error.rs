//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Store failures are captured to
//! Sentry before responding; their details never reach the client.
//!
//! | Error | Status |
//! |---|---|
//! | duplicate customer email, malformed body | 400 |
//! | customer not found, certificate not found, malformed certificate id | 404 |
//! | store failure | 500 (404 on the certificate update route) |

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::ledger::LedgerError;
use crate::registry::RegistryError;
use crate::store::StoreError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Customer registry operation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Certificate ledger operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The certificate update could not be applied.
    ///
    /// Reported as not found whatever the cause; a store failure is still
    /// logged and captured.
    #[error("certificate update failed: {0}")]
    UpdateFailed(LedgerError),

    /// Request body could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    /// The store error behind this failure, if any.
    fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Registry(RegistryError::Store(e))
            | Self::Ledger(LedgerError::Store(e))
            | Self::UpdateFailed(LedgerError::Store(e)) => Some(e),
            _ => None,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Registry(err) => match err {
                RegistryError::DuplicateKey(_) => StatusCode::BAD_REQUEST,
                RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
                RegistryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Ledger(err) => match err {
                LedgerError::CustomerNotFound(_)
                | LedgerError::InvalidId(_)
                | LedgerError::CertificateNotFound(_) => StatusCode::NOT_FOUND,
                LedgerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::UpdateFailed(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Registry(err) => match err {
                RegistryError::DuplicateKey(_) => "Customer with email exists.".to_string(),
                RegistryError::NotFound(_) => "Customer does not exist.".to_string(),
                RegistryError::Store(_) => "Internal server error".to_string(),
            },
            Self::Ledger(err) => match err {
                LedgerError::CustomerNotFound(_) => "Customer does not exist.".to_string(),
                LedgerError::InvalidId(_) | LedgerError::CertificateNotFound(_) => {
                    "Certificate not found.".to_string()
                }
                LedgerError::Store(_) => "Internal server error".to_string(),
            },
            Self::UpdateFailed(_) => "Certificate not found.".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture store failures to Sentry
        if let Some(store_error) = self.store_error() {
            let event_id = sentry::capture_error(store_error);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (self.status(), self.message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use certdesk_core::{CertificateId, Email};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    fn store_failure() -> StoreError {
        StoreError::Database(sqlx::Error::PoolTimedOut)
    }

    #[test]
    fn test_registry_status_codes() {
        let email = Email::parse("ann@x.com").unwrap();
        assert_eq!(
            get_status(RegistryError::DuplicateKey(email).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(RegistryError::NotFound("ann@x.com".to_string()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(RegistryError::Store(store_failure()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_ledger_status_codes() {
        assert_eq!(
            get_status(LedgerError::CustomerNotFound("ann@x.com".to_string()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(LedgerError::from(CertificateId::parse("nope").unwrap_err()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(LedgerError::CertificateNotFound(CertificateId::generate()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(LedgerError::Store(store_failure()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_update_failures_are_not_found() {
        assert_eq!(
            get_status(AppError::UpdateFailed(LedgerError::Store(store_failure()))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_bad_request() {
        assert_eq!(
            get_status(AppError::BadRequest("missing field".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_store_details_are_hidden() {
        let err = AppError::from(RegistryError::Store(store_failure()));
        assert_eq!(err.message(), "Internal server error");
    }
}
