//! `PostgreSQL` backend.
//!
//! ## Tables
//!
//! - `certdesk.customer` - one row per customer, `email` is the primary key
//! - `certdesk.certificate` - one row per certificate, indexed by `email`
//!
//! Queries are checked at runtime (`sqlx::query_as`) rather than with the
//! compile-time macros, so the crate builds without a live database.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use certdesk_core::{Certificate, CertificateId, Customer, Email};

use super::{CertificateCollection, CustomerCollection, Store, StoreError};
use crate::config::DatabaseConfig;

/// Create a `PostgreSQL` connection pool from configuration.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(config.connect_options()?)
        .await
}

/// Map a unique-index violation to [`StoreError::DuplicateKey`].
fn map_insert_error(e: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::DuplicateKey(format!("{what} already exists"));
    }
    StoreError::Database(e)
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    name: String,
    email: String,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = StoreError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            StoreError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            name: row.name,
            email,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CertificateRow {
    id: CertificateId,
    email: String,
    private_key: String,
    body: String,
    active: bool,
}

impl TryFrom<CertificateRow> for Certificate {
    type Error = StoreError;

    fn try_from(row: CertificateRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            StoreError::DataCorruption(format!(
                "invalid email on certificate {}: {e}",
                row.id
            ))
        })?;

        Ok(Self {
            id: row.id,
            email,
            private_key: row.private_key,
            body: row.body,
            active: row.active,
        })
    }
}

// =============================================================================
// Collections
// =============================================================================

/// The `customers` collection backed by `certdesk.customer`.
#[derive(Debug, Clone)]
pub struct PgCustomers {
    pool: PgPool,
}

impl CustomerCollection for PgCustomers {
    async fn insert_one(&self, customer: &Customer) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO certdesk.customer (email, name) VALUES ($1, $2)")
            .bind(&customer.email)
            .bind(&customer.name)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, "customer email"))?;

        Ok(())
    }

    async fn find_one(&self, email: &Email) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT name, email FROM certdesk.customer WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn count(&self, email: &Email) -> Result<u64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM certdesk.customer WHERE email = $1")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        u64::try_from(count)
            .map_err(|_| StoreError::DataCorruption(format!("negative row count: {count}")))
    }

    async fn remove_one(&self, email: &Email) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM certdesk.customer WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// The `certificates` collection backed by `certdesk.certificate`.
#[derive(Debug, Clone)]
pub struct PgCertificates {
    pool: PgPool,
}

impl CertificateCollection for PgCertificates {
    async fn insert_one(&self, certificate: &Certificate) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO certdesk.certificate (id, email, private_key, body, active)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(certificate.id)
        .bind(&certificate.email)
        .bind(&certificate.private_key)
        .bind(&certificate.body)
        .bind(certificate.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "certificate id"))?;

        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Vec<Certificate>, StoreError> {
        let rows = sqlx::query_as::<_, CertificateRow>(
            r"
            SELECT id, email, private_key, body, active
            FROM certdesk.certificate
            WHERE email = $1
            ORDER BY created_at, id
            ",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn set_active(&self, id: CertificateId, active: bool) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE certdesk.certificate SET active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Store
// =============================================================================

/// Store client over a shared `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    customers: PgCustomers,
    certificates: PgCertificates,
}

impl PgStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            customers: PgCustomers { pool: pool.clone() },
            certificates: PgCertificates { pool },
        }
    }

    /// Connect using the database configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the pool cannot be created.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        Ok(Self::new(create_pool(config).await?))
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.customers.pool
    }

    /// Close every pooled connection, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool().close().await;
    }
}

impl Store for PgStore {
    type Customers = PgCustomers;
    type Certificates = PgCertificates;

    fn customers(&self) -> &PgCustomers {
        &self.customers
    }

    fn certificates(&self) -> &PgCertificates {
        &self.certificates
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool()).await?;
        Ok(())
    }
}
