//! Customer records.

use serde::{Deserialize, Serialize};

use super::email::Email;

/// A registered customer.
///
/// `email` is the business key and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Display name (not unique).
    pub name: String,
    /// Unique email address.
    pub email: Email,
}

/// Request body for registering a customer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: Email,
}

impl From<NewCustomer> for Customer {
    fn from(new: NewCustomer) -> Self {
        Self {
            name: new.name,
            email: new.email,
        }
    }
}
