//! # Store Identifiers
//!
//! [`DocumentId`] is the opaque identifier the document store assigns on
//! insert. It is 24 lowercase hex characters: a 4-byte big-endian Unix
//! timestamp followed by 8 random bytes, so ids sort roughly by creation
//! time. No uniqueness check is made against the store.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Opaque store-assigned document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Length of the hex representation.
    pub const LEN: usize = 24;

    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        let secs = chrono::Utc::now().timestamp().clamp(0, i64::from(u32::MAX)) as u32;
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        rand::thread_rng().fill_bytes(&mut bytes[4..]);
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Parse an identifier supplied by a caller.
    ///
    /// Accepts upper- or lowercase hex and normalizes to lowercase.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if s.len() != Self::LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidDocumentId(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Borrow the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl std::str::FromStr for DocumentId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
