//! # Developer & Organisation Records
//!
//! Registration writes a developer record, then an organisation record that
//! points back at it, then patches the developer record with the
//! organisation id. The three writes are not atomic.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::identity::DocumentId;

/// Stored developer registration, including the issued credentials.
///
/// Custom `Debug` redacts `org_key` and `org_secret`.
#[derive(Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeveloperRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<DocumentId>,
    pub developer_email: String,
    #[serde(default)]
    pub developer_website: String,
    #[serde(default)]
    pub developer_city: String,
    #[serde(default)]
    pub developer_mobile: String,
    pub organisation_name: String,
    #[serde(default)]
    pub contact_consent: bool,
    pub org_key: String,
    pub org_secret: String,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub client_ip: String,
    /// Request headers captured at registration, multi-valued headers
    /// joined with `,`.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Back-reference to the organisation record, set after it is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<String>,
}

impl std::fmt::Debug for DeveloperRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeveloperRecord")
            .field("id", &self.id)
            .field("developer_email", &self.developer_email)
            .field("organisation_name", &self.organisation_name)
            .field("org_key", &"[REDACTED]")
            .field("org_secret", &"[REDACTED]")
            .field("registered_at", &self.registered_at)
            .field("client_ip", &self.client_ip)
            .field("organisation_id", &self.organisation_id)
            .finish_non_exhaustive()
    }
}

/// Organisation record created alongside a developer registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrganisationRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<DocumentId>,
    pub organisation_name: String,
    pub developer_email: String,
    pub developer_details_id: String,
    pub registered_at: DateTime<Utc>,
}
