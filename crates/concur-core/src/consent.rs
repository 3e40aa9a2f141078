//! # Consent Records
//!
//! A consent record captures one data principal's decisions against one
//! collection point. There is at most one record per `(dp_id, cp_id)` pair;
//! posting again replaces the record wholesale.
//!
//! Apart from the scope entries and the two keys, the record carries a fixed
//! artifact envelope (context, agreement fields, principal and fiduciary
//! blocks, rights). Fields that are not collected yet are stored as empty
//! strings so the shape is stable for downstream consumers.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON-LD style context for consent artifacts.
pub const CONSENT_CONTEXT: &str = "https://consent.foundation/artifact/v1";

const ENCRYPTED_PLACEHOLDER: &str = "NULL [Encrypted]";

/// One consent decision for a (data element, purpose) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConsentScopeEntry {
    pub data_element_name: String,
    pub purpose_id: String,
    pub consent_status: bool,
    pub shared: bool,
    #[serde(default)]
    pub data_processor_id: Vec<String>,
    pub cross_border: bool,
    /// Set by the server when the record is built.
    #[serde(default)]
    pub consent_timestamp: String,
    /// Set by the server when the record is built.
    #[serde(default)]
    pub expiry_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttorneyBlock {
    pub dp_df_id: String,
    pub dp_public_key: String,
    pub dp_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DataPrincipalBlock {
    pub dp_df_id: String,
    pub dp_public_key: String,
    pub dp_residency: String,
    pub dp_email: String,
    pub dp_verification: String,
    pub dp_child: String,
    pub dp_attorney: AttorneyBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DataFiduciaryBlock {
    pub df_id: String,
    pub agreement_date: String,
    pub date_of_consent: String,
    pub consent_status: String,
    pub revocation_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DataPrincipalRights {
    pub right_to_access: bool,
    pub right_to_rectify: bool,
    pub right_to_erase: bool,
    pub right_to_restrict_processing: bool,
    pub right_to_data_portability: bool,
}

impl Default for DataPrincipalRights {
    fn default() -> Self {
        Self {
            right_to_access: true,
            right_to_rectify: true,
            right_to_erase: true,
            right_to_restrict_processing: true,
            right_to_data_portability: true,
        }
    }
}

/// Stored consent preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConsentRecord {
    pub context: String,
    /// Name of the collection point the consent was given against.
    #[serde(rename = "type")]
    pub cp_type: String,
    pub agreement_hash_id: String,
    pub agreement_version: String,
    pub linked_agreement_hash: String,
    pub data_principal: DataPrincipalBlock,
    pub data_fiduciary: DataFiduciaryBlock,
    pub data_principal_rights: DataPrincipalRights,
    pub consent_scope: Vec<ConsentScopeEntry>,
    pub dp_id: String,
    pub cp_id: String,
    #[serde(default)]
    pub dp_email_hash: String,
}

impl ConsentRecord {
    /// Build a fresh consent record, stamping the consent date and every
    /// scope entry with the current time.
    pub fn new(
        cp_name: impl Into<String>,
        dp_id: impl Into<String>,
        cp_id: impl Into<String>,
        dp_email_hash: impl Into<String>,
        scope: Vec<ConsentScopeEntry>,
    ) -> Self {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let consent_scope = scope
            .into_iter()
            .map(|mut entry| {
                entry.consent_timestamp = now.clone();
                entry.expiry_date = now.clone();
                entry
            })
            .collect();

        Self {
            context: CONSENT_CONTEXT.to_string(),
            cp_type: cp_name.into(),
            agreement_hash_id: String::new(),
            agreement_version: String::new(),
            linked_agreement_hash: String::new(),
            data_principal: DataPrincipalBlock {
                dp_df_id: String::new(),
                dp_public_key: String::new(),
                dp_residency: String::new(),
                dp_email: ENCRYPTED_PLACEHOLDER.to_string(),
                dp_verification: String::new(),
                dp_child: String::new(),
                dp_attorney: AttorneyBlock {
                    dp_df_id: String::new(),
                    dp_public_key: String::new(),
                    dp_email: ENCRYPTED_PLACEHOLDER.to_string(),
                },
            },
            data_fiduciary: DataFiduciaryBlock {
                df_id: String::new(),
                agreement_date: String::new(),
                date_of_consent: now,
                consent_status: "active".to_string(),
                revocation_date: None,
            },
            data_principal_rights: DataPrincipalRights::default(),
            consent_scope,
            dp_id: dp_id.into(),
            cp_id: cp_id.into(),
            dp_email_hash: dp_email_hash.into(),
        }
    }
}
