//! # Organisation Credentials
//!
//! The `(org_id, org_key, org_secret)` triple issued at registration and
//! presented on every organisation-scoped request.

use serde::Deserialize;

/// Bearer-style organisation credentials.
///
/// Custom `Debug` redacts the key and secret to prevent credential leakage
/// in logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct OrgCredentials {
    pub org_id: String,
    pub org_key: String,
    pub org_secret: String,
}

impl OrgCredentials {
    pub fn new(
        org_id: impl Into<String>,
        org_key: impl Into<String>,
        org_secret: impl Into<String>,
    ) -> Self {
        Self {
            org_id: org_id.into(),
            org_key: org_key.into(),
            org_secret: org_secret.into(),
        }
    }
}

impl std::fmt::Debug for OrgCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrgCredentials")
            .field("org_id", &self.org_id)
            .field("org_key", &"[REDACTED]")
            .field("org_secret", &"[REDACTED]")
            .finish()
    }
}
