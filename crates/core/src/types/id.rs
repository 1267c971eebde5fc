//! Certificate identifiers.
//!
//! Identifiers are random (v4) UUIDs generated by the server when a
//! certificate is created. Clients only ever hand them back in a path, so
//! parsing is strict and happens before any database access.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when a string is not a well-formed certificate identifier.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid certificate id: {input:?}")]
pub struct CertificateIdError {
    input: String,
}

impl CertificateIdError {
    /// The rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Unique, immutable identifier of a certificate.
///
/// ```
/// use certdesk_core::CertificateId;
///
/// let id = CertificateId::generate();
/// let parsed = CertificateId::parse(&id.to_string()).unwrap();
/// assert_eq!(id, parsed);
///
/// assert!(CertificateId::parse("not-an-id").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateId(Uuid);

impl CertificateId {
    /// Generate a fresh, globally unique identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier in its canonical hyphenated form.
    ///
    /// Only the 36-character hyphenated form produced by `Display` is
    /// accepted; braced, URN and simple (unhyphenated) forms are rejected so
    /// every certificate has exactly one textual id.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateIdError`] if `s` is not a hyphenated UUID.
    pub fn parse(s: &str) -> Result<Self, CertificateIdError> {
        let invalid = || CertificateIdError {
            input: s.to_owned(),
        };

        if s.len() != uuid::fmt::Hyphenated::LENGTH {
            return Err(invalid());
        }

        Uuid::try_parse(s).map(Self).map_err(|_| invalid())
    }

    /// Wrap an existing UUID (used when decoding stored rows).
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for CertificateId {
    type Err = CertificateIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for CertificateId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Uuid as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Uuid as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for CertificateId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let id = <Uuid as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(id))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for CertificateId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Uuid as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| CertificateId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let id = CertificateId::generate();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(CertificateId::parse(&text).unwrap(), id);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "",
            "123",
            "not-a-uuid-at-all-but-36-characters!",
            "67e5504410b1426f9247bb680e5fe0c8",
            "{67e55044-10b1-426f-9247-bb680e5fe0c8}",
            "urn:uuid:67e55044-10b1-426f-9247-bb680e5fe0c8",
            "67e55044-10b1-426f-9247-bb680e5fe0cz",
            "507f1f77bcf86cd799439011",
        ] {
            let err = CertificateId::parse(input).unwrap_err();
            assert_eq!(err.input(), input);
        }
    }

    #[test]
    fn test_parse_accepts_uppercase() {
        let id = CertificateId::parse("67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();
        assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn test_serializes_as_string() {
        let id = CertificateId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"67e55044-10b1-426f-9247-bb680e5fe0c8\""
        );
    }
}
