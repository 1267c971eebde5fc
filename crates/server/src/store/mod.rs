//! Persistence for the two collections, `customers` and `certificates`.
//!
//! The registry and ledger only see the [`Store`] trait. Two backends
//! implement it:
//!
//! - [`postgres::PgStore`] - one table per collection, used in production
//! - [`memory::MemoryStore`] - process-local maps, used by tests and local runs
//!
//! Every method is a single round trip. "Nothing matched" is part of the
//! successful return value (`None`, `false`, an empty `Vec`), never an error,
//! so callers can tell it apart from a failing store.
//!
//! # Migrations
//!
//! The `PostgreSQL` schema lives in `crates/server/migrations/` and is applied via:
//! ```bash
//! cargo run -p certdesk-cli -- migrate
//! ```

#[cfg(test)]
pub(crate) mod failing;
pub mod memory;
pub mod postgres;

use std::future::Future;

use certdesk_core::{Certificate, CertificateId, Customer, Email};
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx (connection, timeout, protocol).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique index rejected the insert.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// The `customers` collection, keyed by email.
pub trait CustomerCollection: Send + Sync {
    /// Insert one customer.
    ///
    /// Returns [`StoreError::DuplicateKey`] if the email is already taken.
    fn insert_one(&self, customer: &Customer) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Find the customer with this email.
    fn find_one(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<Customer>, StoreError>> + Send;

    /// Count customers with this email (0 or 1).
    fn count(&self, email: &Email) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Remove the customer with this email. Returns whether a document matched.
    fn remove_one(&self, email: &Email) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// The `certificates` collection, keyed by generated id.
pub trait CertificateCollection: Send + Sync {
    /// Insert one certificate.
    fn insert_one(
        &self,
        certificate: &Certificate,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// All certificates issued to this email, oldest first.
    fn find_by_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Vec<Certificate>, StoreError>> + Send;

    /// Set the `active` flag of one certificate. Returns whether a document matched.
    fn set_active(
        &self,
        id: CertificateId,
        active: bool,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// A store client holding both collections.
///
/// Cloning is cheap; clones share the same underlying connection pool or maps.
pub trait Store: Clone + Send + Sync + 'static {
    /// Backend for the `customers` collection.
    type Customers: CustomerCollection;
    /// Backend for the `certificates` collection.
    type Certificates: CertificateCollection;

    /// The `customers` collection.
    fn customers(&self) -> &Self::Customers;

    /// The `certificates` collection.
    fn certificates(&self) -> &Self::Certificates;

    /// Check that the store is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
