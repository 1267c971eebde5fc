//! In-memory backend.
//!
//! Behaves like the `PostgreSQL` backend (unique emails, insertion order,
//! match counts) without a database.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use certdesk_core::{Certificate, CertificateId, Customer, Email};

use super::{CertificateCollection, CustomerCollection, Store, StoreError};

/// In-memory `customers` collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryCustomers {
    docs: Arc<RwLock<BTreeMap<Email, Customer>>>,
}

impl MemoryCustomers {
    /// Number of stored customers.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Whether the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

impl CustomerCollection for MemoryCustomers {
    async fn insert_one(&self, customer: &Customer) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        if docs.contains_key(&customer.email) {
            return Err(StoreError::DuplicateKey(
                "customer email already exists".to_owned(),
            ));
        }
        docs.insert(customer.email.clone(), customer.clone());
        Ok(())
    }

    async fn find_one(&self, email: &Email) -> Result<Option<Customer>, StoreError> {
        Ok(self.docs.read().await.get(email).cloned())
    }

    async fn count(&self, email: &Email) -> Result<u64, StoreError> {
        Ok(u64::from(self.docs.read().await.contains_key(email)))
    }

    async fn remove_one(&self, email: &Email) -> Result<bool, StoreError> {
        Ok(self.docs.write().await.remove(email).is_some())
    }
}

/// In-memory `certificates` collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryCertificates {
    docs: Arc<RwLock<Vec<Certificate>>>,
}

impl MemoryCertificates {
    /// Number of stored certificates.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Whether the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

impl CertificateCollection for MemoryCertificates {
    async fn insert_one(&self, certificate: &Certificate) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        if docs.iter().any(|doc| doc.id == certificate.id) {
            return Err(StoreError::DuplicateKey(
                "certificate id already exists".to_owned(),
            ));
        }
        docs.push(certificate.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Vec<Certificate>, StoreError> {
        Ok(self
            .docs
            .read()
            .await
            .iter()
            .filter(|doc| doc.email == *email)
            .cloned()
            .collect())
    }

    async fn set_active(&self, id: CertificateId, active: bool) -> Result<bool, StoreError> {
        let mut docs = self.docs.write().await;
        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(doc) => {
                doc.active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Store client over process-local maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    customers: MemoryCustomers,
    certificates: MemoryCertificates,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    type Customers = MemoryCustomers;
    type Certificates = MemoryCertificates;

    fn customers(&self) -> &MemoryCustomers {
        &self.customers
    }

    fn certificates(&self) -> &MemoryCertificates {
        &self.certificates
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customer(email: &str) -> Customer {
        Customer {
            name: "Ann".to_owned(),
            email: Email::parse(email).unwrap(),
        }
    }

    fn certificate(email: &str) -> Certificate {
        Certificate {
            id: CertificateId::generate(),
            email: Email::parse(email).unwrap(),
            private_key: "k".to_owned(),
            body: "b".to_owned(),
            active: false,
        }
    }

    #[tokio::test]
    async fn test_customer_insert_enforces_unique_email() {
        let store = MemoryStore::new();
        let ann = customer("ann@x.com");

        store.customers().insert_one(&ann).await.unwrap();
        let err = store.customers().insert_one(&ann).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(_)));
        assert_eq!(store.customers().len().await, 1);
    }

    #[tokio::test]
    async fn test_customer_count_and_remove() {
        let store = MemoryStore::new();
        let ann = customer("ann@x.com");
        store.customers().insert_one(&ann).await.unwrap();

        assert_eq!(store.customers().count(&ann.email).await.unwrap(), 1);
        assert!(store.customers().remove_one(&ann.email).await.unwrap());
        assert_eq!(store.customers().count(&ann.email).await.unwrap(), 0);
        assert!(!store.customers().remove_one(&ann.email).await.unwrap());
    }

    #[tokio::test]
    async fn test_certificates_filtered_by_email_in_insertion_order() {
        let store = MemoryStore::new();
        let first = certificate("ann@x.com");
        let other = certificate("bob@x.com");
        let second = certificate("ann@x.com");
        for cert in [&first, &other, &second] {
            store.certificates().insert_one(cert).await.unwrap();
        }

        let found = store
            .certificates()
            .find_by_email(&first.email)
            .await
            .unwrap();
        assert_eq!(found, vec![first, second]);
    }

    #[tokio::test]
    async fn test_set_active_reports_match() {
        let store = MemoryStore::new();
        let cert = certificate("ann@x.com");
        store.certificates().insert_one(&cert).await.unwrap();

        assert!(store.certificates().set_active(cert.id, true).await.unwrap());
        assert!(
            !store
                .certificates()
                .set_active(CertificateId::generate(), true)
                .await
                .unwrap()
        );

        let found = store.certificates().find_by_email(&cert.email).await.unwrap();
        assert!(found.iter().all(|c| c.active));
    }
}
