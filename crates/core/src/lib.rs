//! certdesk core - shared domain types.
//!
//! This crate provides the types used across all certdesk components:
//! - `server` - HTTP service for customers and their certificates
//! - `cli` - Command-line tools for schema setup
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Validated identifiers (`Email`, `CertificateId`) and the
//!   customer/certificate records exchanged over HTTP and stored in the database

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
