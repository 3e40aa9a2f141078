//! # Collection Points
//!
//! A collection point declares which personal data an application collects,
//! for which purposes and under which legal basis. Data elements and their
//! purposes are ordered; order is preserved through the store and the
//! manifest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::generate;
use crate::identity::DocumentId;

/// Status assigned to newly created collection points and data elements.
pub const DEFAULT_CP_STATUS: &str = "active";

fn default_status() -> String {
    DEFAULT_CP_STATUS.to_string()
}

/// A purpose for which a data element is processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Purpose {
    /// Server-generated 16-character hex id. Empty on inbound requests.
    #[serde(default)]
    pub purpose_id: String,
    pub purpose_description: String,
    pub purpose_language: String,
}

/// A single category of personal data declared by a collection point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DataElement {
    pub data_element: String,
    pub data_element_title: String,
    pub data_element_description: String,
    #[serde(default = "default_status")]
    pub data_element_collection_status: String,
    #[serde(default)]
    pub expiry: u32,
    #[serde(default)]
    pub cross_border: bool,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub retention_period: u32,
    #[serde(default)]
    pub data_owner: Vec<String>,
    #[serde(default)]
    pub legal_basis: String,
    #[serde(default)]
    pub purposes: Vec<Purpose>,
}

/// Stored collection point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CollectionPointRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<DocumentId>,
    pub org_id: String,
    pub application_id: String,
    pub cp_name: String,
    #[serde(default = "default_status")]
    pub cp_status: String,
    /// Public URL, derived from the store id after insert.
    #[serde(default)]
    pub cp_url: String,
    #[serde(default)]
    pub data_elements: Vec<DataElement>,
    pub registered_at: DateTime<Utc>,
}

impl CollectionPointRecord {
    /// Build a new, not yet stored, collection point.
    ///
    /// Every data element is reset to the `active` collection status with
    /// the cross-border, sensitive and encrypted flags cleared, and every
    /// purpose receives a fresh id.
    pub fn new(
        org_id: impl Into<String>,
        application_id: impl Into<String>,
        cp_name: impl Into<String>,
        data_elements: Vec<DataElement>,
    ) -> Self {
        let data_elements = data_elements
            .into_iter()
            .map(|mut de| {
                de.data_element_collection_status = default_status();
                de.cross_border = false;
                de.sensitive = false;
                de.encrypted = false;
                for purpose in &mut de.purposes {
                    purpose.purpose_id = generate::hex(generate::PURPOSE_ID_LEN);
                }
                de
            })
            .collect();

        Self {
            id: None,
            org_id: org_id.into(),
            application_id: application_id.into(),
            cp_name: cp_name.into(),
            cp_status: default_status(),
            cp_url: String::new(),
            data_elements,
            registered_at: Utc::now(),
        }
    }

    /// Public URL for a stored collection point.
    pub fn url_for(id: &DocumentId) -> String {
        format!("demo.api.com/{id}")
    }

    /// Whether a data element with exactly this name is declared.
    pub fn declares_data_element(&self, name: &str) -> bool {
        self.data_elements.iter().any(|de| de.data_element == name)
    }
}
