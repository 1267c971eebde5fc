//! Customer registry.
//!
//! Owns the `customers` collection. The email is the business key: it is
//! unique across customers and never changes after creation.

use thiserror::Error;
use tracing::instrument;

use certdesk_core::{Customer, Email, NewCustomer};

use crate::store::{CustomerCollection, Store, StoreError};

/// Errors returned by [`CustomerRegistry`].
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A customer with this email is already registered.
    #[error("customer with email {0} already exists")]
    DuplicateKey(Email),

    /// No customer is registered under this email.
    #[error("customer {0} does not exist")]
    NotFound(String),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Creates, reads and deletes customers.
#[derive(Debug, Clone)]
pub struct CustomerRegistry<S> {
    store: S,
}

impl<S: Store> CustomerRegistry<S> {
    /// Create a registry over a store client.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateKey` if the email is taken, including
    /// when a concurrent request wins the race to the unique index.
    /// Returns `RegistryError::Store` if the store fails.
    #[instrument(skip(self, new), fields(email = %new.email))]
    pub async fn create(&self, new: NewCustomer) -> Result<Customer, RegistryError> {
        if self.exists(&new.email).await? {
            return Err(RegistryError::DuplicateKey(new.email));
        }

        let customer = Customer::from(new);
        match self.store.customers().insert_one(&customer).await {
            Ok(()) => {}
            Err(StoreError::DuplicateKey(_)) => {
                return Err(RegistryError::DuplicateKey(customer.email));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!("customer created");
        Ok(customer)
    }

    /// Look up a customer by email.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if no customer has this email
    /// (including strings that are not valid emails at all).
    /// Returns `RegistryError::Store` if the store fails.
    #[instrument(skip(self))]
    pub async fn get(&self, email: &str) -> Result<Customer, RegistryError> {
        let key = lookup_key(email)?;

        self.store
            .customers()
            .find_one(&key)
            .await?
            .ok_or_else(|| RegistryError::NotFound(email.to_owned()))
    }

    /// Delete a customer by email.
    ///
    /// Certificates issued to the customer are left in place.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if nothing matched.
    /// Returns `RegistryError::Store` if the store fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, email: &str) -> Result<(), RegistryError> {
        let key = lookup_key(email)?;

        if !self.store.customers().remove_one(&key).await? {
            return Err(RegistryError::NotFound(email.to_owned()));
        }

        tracing::info!("customer deleted");
        Ok(())
    }

    /// Whether a customer with this email exists.
    ///
    /// Runs a count query rather than fetching the document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store fails.
    pub async fn exists(&self, email: &Email) -> Result<bool, StoreError> {
        Ok(self.store.customers().count(email).await? > 0)
    }
}

/// Parse a path email; anything unparseable cannot be registered.
fn lookup_key(email: &str) -> Result<Email, RegistryError> {
    Email::parse(email).map_err(|_| RegistryError::NotFound(email.to_owned()))
}
