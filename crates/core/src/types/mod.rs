//! Core types for certdesk.
//!
//! This module provides type-safe wrappers for the domain concepts.

pub mod certificate;
pub mod customer;
pub mod email;
pub mod id;

pub use certificate::{ActiveUpdate, Certificate, NewCertificate};
pub use customer::{Customer, NewCustomer};
pub use email::{Email, EmailError};
pub use id::{CertificateId, CertificateIdError};
