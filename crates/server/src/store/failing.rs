//! Test backend whose collections fail like an unreachable database.

use certdesk_core::{Certificate, CertificateId, Customer, Email};

use super::memory::MemoryCustomers;
use super::{CertificateCollection, CustomerCollection, Store, StoreError};

/// The error every failing call returns.
pub fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

/// `customers` collection that fails when `down`, else behaves like memory.
#[derive(Debug, Clone, Default)]
pub struct FailingCustomers {
    docs: MemoryCustomers,
    down: bool,
}

impl CustomerCollection for FailingCustomers {
    async fn insert_one(&self, customer: &Customer) -> Result<(), StoreError> {
        if self.down {
            return Err(unavailable());
        }
        self.docs.insert_one(customer).await
    }

    async fn find_one(&self, email: &Email) -> Result<Option<Customer>, StoreError> {
        if self.down {
            return Err(unavailable());
        }
        self.docs.find_one(email).await
    }

    async fn count(&self, email: &Email) -> Result<u64, StoreError> {
        if self.down {
            return Err(unavailable());
        }
        self.docs.count(email).await
    }

    async fn remove_one(&self, email: &Email) -> Result<bool, StoreError> {
        if self.down {
            return Err(unavailable());
        }
        self.docs.remove_one(email).await
    }
}

/// `certificates` collection that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCertificates;

impl CertificateCollection for FailingCertificates {
    async fn insert_one(&self, _: &Certificate) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn find_by_email(&self, _: &Email) -> Result<Vec<Certificate>, StoreError> {
        Err(unavailable())
    }

    async fn set_active(&self, _: CertificateId, _: bool) -> Result<bool, StoreError> {
        Err(unavailable())
    }
}

/// Store client over the failing collections.
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    customers: FailingCustomers,
    certificates: FailingCertificates,
}

impl FailingStore {
    /// Every call fails, `ping` included.
    pub fn down() -> Self {
        Self {
            customers: FailingCustomers {
                docs: MemoryCustomers::default(),
                down: true,
            },
            certificates: FailingCertificates,
        }
    }

    /// Customers work and already hold `emails`; every certificate call fails.
    pub async fn certificates_down(emails: &[&str]) -> Self {
        let store = Self::default();
        for email in emails {
            let customer = Customer {
                name: "Ann".to_owned(),
                email: Email::parse(email).expect("seed email must be valid"),
            };
            store
                .customers
                .docs
                .insert_one(&customer)
                .await
                .expect("seed emails must be distinct");
        }
        store
    }
}

impl Store for FailingStore {
    type Customers = FailingCustomers;
    type Certificates = FailingCertificates;

    fn customers(&self) -> &FailingCustomers {
        &self.customers
    }

    fn certificates(&self) -> &FailingCertificates {
        &self.certificates
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.customers.down {
            return Err(unavailable());
        }
        Ok(())
    }
}
