//! Application state shared across handlers.

use std::sync::Arc;

use crate::ledger::CertificateLedger;
use crate::registry::CustomerRegistry;
use crate::store::Store;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The store client is built once
/// at startup and handed to both the registry and the ledger here.
pub struct AppState<S> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    store: S,
    customers: CustomerRegistry<S>,
    certificates: CertificateLedger<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Store> AppState<S> {
    /// Create a new application state over a store client.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                customers: CustomerRegistry::new(store.clone()),
                certificates: CertificateLedger::new(store.clone()),
                store,
            }),
        }
    }

    /// Get a reference to the store client.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Get a reference to the customer registry.
    #[must_use]
    pub fn customers(&self) -> &CustomerRegistry<S> {
        &self.inner.customers
    }

    /// Get a reference to the certificate ledger.
    #[must_use]
    pub fn certificates(&self) -> &CertificateLedger<S> {
        &self.inner.certificates
    }
}
