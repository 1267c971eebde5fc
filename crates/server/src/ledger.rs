//! Certificate ledger.
//!
//! Owns the `certificates` collection. A certificate can only be issued to an
//! email that the [`CustomerRegistry`] knows about at that moment; the link is
//! not maintained afterwards.

use thiserror::Error;
use tracing::instrument;

use certdesk_core::{
    ActiveUpdate, Certificate, CertificateId, CertificateIdError, Email, NewCertificate,
};

use crate::registry::CustomerRegistry;
use crate::store::{CertificateCollection, Store, StoreError};

/// Errors returned by [`CertificateLedger`].
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The referenced customer does not exist.
    #[error("customer {0} does not exist")]
    CustomerNotFound(String),

    /// The supplied identifier is malformed.
    #[error(transparent)]
    InvalidId(#[from] CertificateIdError),

    /// The identifier is well-formed but no certificate has it.
    #[error("certificate {0} does not exist")]
    CertificateNotFound(CertificateId),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Issues certificates, lists them per customer and toggles `active`.
#[derive(Debug, Clone)]
pub struct CertificateLedger<S> {
    store: S,
    customers: CustomerRegistry<S>,
}

impl<S: Store> CertificateLedger<S> {
    /// Create a ledger over a store client.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            customers: CustomerRegistry::new(store.clone()),
            store,
        }
    }

    /// Issue a certificate to an existing customer.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::CustomerNotFound` if the email is not registered;
    /// nothing is inserted in that case.
    /// Returns `LedgerError::Store` if the store fails.
    #[instrument(skip(self, new), fields(email = %new.email))]
    pub async fn create(&self, new: NewCertificate) -> Result<Certificate, LedgerError> {
        let email = self.require_customer(&new.email).await?;

        let certificate = Certificate::issue(email, new);
        self.store.certificates().insert_one(&certificate).await?;

        tracing::info!(certificate_id = %certificate.id, "certificate issued");
        Ok(certificate)
    }

    /// All certificates issued to a customer. Empty if they have none.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::CustomerNotFound` if the email is not registered.
    /// Returns `LedgerError::Store` if the store fails.
    #[instrument(skip(self))]
    pub async fn list_by_customer(&self, email: &str) -> Result<Vec<Certificate>, LedgerError> {
        let email = self.require_customer(email).await?;

        Ok(self.store.certificates().find_by_email(&email).await?)
    }

    /// Set the `active` flag of a certificate.
    ///
    /// The identifier is validated before the store is touched.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidId` if `id` is malformed.
    /// Returns `LedgerError::CertificateNotFound` if no certificate matched.
    /// Returns `LedgerError::Store` if the store fails.
    #[instrument(skip(self))]
    pub async fn update_active(&self, id: &str, update: ActiveUpdate) -> Result<(), LedgerError> {
        self.set_active(CertificateId::parse(id)?, update).await
    }

    /// Set the `active` flag of a certificate whose id is already parsed.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::CertificateNotFound` if no certificate matched.
    /// Returns `LedgerError::Store` if the store fails.
    #[instrument(skip(self))]
    pub async fn set_active(
        &self,
        id: CertificateId,
        update: ActiveUpdate,
    ) -> Result<(), LedgerError> {
        if !self
            .store
            .certificates()
            .set_active(id, update.active)
            .await?
        {
            return Err(LedgerError::CertificateNotFound(id));
        }

        tracing::info!(certificate_id = %id, active = update.active, "certificate updated");
        Ok(())
    }

    /// Resolve `email` to a registered customer's key.
    async fn require_customer(&self, email: &str) -> Result<Email, LedgerError> {
        let not_found = || LedgerError::CustomerNotFound(email.to_owned());

        let key = Email::parse(email).map_err(|_| not_found())?;
        if self.customers.exists(&key).await? {
            Ok(key)
        } else {
            Err(not_found())
        }
    }
}
