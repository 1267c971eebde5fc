//! certdesk server library.
//!
//! This crate provides the customer registry, the certificate ledger and
//! their HTTP surface as a library, allowing them to be tested and reused.
//!
//! # Modules
//!
//! - [`registry`] - Customers, keyed by unique email
//! - [`ledger`] - Certificates issued to existing customers
//! - [`store`] - The `customers`/`certificates` collections (`PostgreSQL` or in-memory)
//! - [`routes`] - Axum handlers and router
//! - [`config`] - Environment-driven configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod routes;
pub mod state;
pub mod store;

pub use error::AppError;
pub use ledger::{CertificateLedger, LedgerError};
pub use registry::{CustomerRegistry, RegistryError};
pub use routes::app;
pub use state::AppState;
pub use store::{MemoryStore, PgStore, Store, StoreError};
