//! Certificate records and the inputs that create or modify them.
//!
//! `private_key` and `body` are opaque payloads; nothing here inspects them.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::CertificateId;

/// A certificate issued to a customer.
///
/// Serialized with the private key under `key` to keep the wire format
/// `{id, email, key, body, active}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: CertificateId,
    /// Email of the customer the certificate was issued to.
    pub email: Email,
    #[serde(rename = "key")]
    pub private_key: String,
    pub body: String,
    pub active: bool,
}

impl Certificate {
    /// Build a certificate for `email` with a freshly generated identifier.
    #[must_use]
    pub fn issue(email: Email, new: NewCertificate) -> Self {
        Self {
            id: CertificateId::generate(),
            email,
            private_key: new.private_key,
            body: new.body,
            active: new.active,
        }
    }
}

/// Request body for issuing a certificate.
///
/// `email` stays a plain string here: an address that does not parse cannot
/// belong to a registered customer, and the ledger reports it that way rather
/// than as a malformed body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCertificate {
    pub email: String,
    #[serde(rename = "key")]
    pub private_key: String,
    pub body: String,
    #[serde(default)]
    pub active: bool,
}

/// Request body for toggling a certificate's `active` flag.
///
/// Any other field is rejected so an update can never touch the key or body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActiveUpdate {
    pub active: bool,
}
