//! Manifest document types and YAML codec.

use serde::{Deserialize, Serialize};

use concur_core::{ApplicationRecord, CollectionPointRecord, DataElement, DEFAULT_CP_STATUS};

use crate::error::ManifestError;

/// Version written into every manifest.
pub const MANIFEST_VERSION: &str = "1.0";

fn default_status() -> String {
    DEFAULT_CP_STATUS.to_string()
}

/// Top-level manifest for one organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDocument {
    pub version: String,
    pub organisation_id: String,
    #[serde(default)]
    pub applications: Vec<ManifestApplication>,
}

/// An application entry. Fields other than `application_id` default to
/// empty so hand-edited uploads with partial entries still parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestApplication {
    pub application_id: String,
    #[serde(rename = "type", default)]
    pub app_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub application_user: String,
    #[serde(default, alias = "collection_points_data")]
    pub collection_points: Vec<ManifestCollectionPoint>,
}

/// A collection point entry, keyed by the store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCollectionPoint {
    #[serde(alias = "collection_point_id")]
    pub cp_id: String,
    pub cp_name: String,
    #[serde(default = "default_status")]
    pub cp_status: String,
    #[serde(default)]
    pub cp_url: String,
    #[serde(default)]
    pub data_elements: Vec<DataElement>,
}

impl ManifestDocument {
    pub fn new(organisation_id: impl Into<String>, applications: Vec<ManifestApplication>) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            organisation_id: organisation_id.into(),
            applications,
        }
    }

    pub fn from_yaml(input: &str) -> Result<Self, ManifestError> {
        serde_yaml::from_str(input).map_err(ManifestError::Parse)
    }

    pub fn to_yaml(&self) -> Result<String, ManifestError> {
        serde_yaml::to_string(self).map_err(ManifestError::Encode)
    }

    /// Applications whose id is exactly `app_id`.
    pub fn applications_with_id<'a>(
        &'a self,
        app_id: &'a str,
    ) -> impl Iterator<Item = &'a ManifestApplication> + 'a {
        self.applications.iter().filter(move |a| a.application_id == app_id)
    }

    /// Append `entry` to the first application with id `app_id`.
    ///
    /// Returns `false` (and leaves the document unchanged) when no
    /// application matches.
    pub fn append_collection_point(&mut self, app_id: &str, entry: ManifestCollectionPoint) -> bool {
        match self.applications.iter_mut().find(|a| a.application_id == app_id) {
            Some(app) => {
                app.collection_points.push(entry);
                true
            }
            None => false,
        }
    }

    /// Remove every collection point with id `cp_id` from every application.
    /// Returns the number of entries removed.
    pub fn remove_collection_point(&mut self, cp_id: &str) -> usize {
        let mut removed = 0;
        for app in &mut self.applications {
            let before = app.collection_points.len();
            app.collection_points.retain(|cp| cp.cp_id != cp_id);
            removed += before - app.collection_points.len();
        }
        removed
    }

    /// Build a manifest from store contents. Collection points are attached
    /// to the application whose `app_id` equals their `application_id`, in
    /// the order given; orphans are dropped.
    pub fn from_records(
        organisation_id: impl Into<String>,
        applications: &[ApplicationRecord],
        collection_points: &[CollectionPointRecord],
    ) -> Self {
        let applications = applications
            .iter()
            .map(|app| {
                let mut entry = ManifestApplication::from(app);
                entry.collection_points = collection_points
                    .iter()
                    .filter(|cp| cp.application_id == app.app_id)
                    .map(ManifestCollectionPoint::from)
                    .collect();
                entry
            })
            .collect();
        Self::new(organisation_id, applications)
    }

    /// Sample manifest showing every supported field.
    pub fn template(organisation_id: impl Into<String>) -> Self {
        let element = |name: &str, title: &str, sensitive: bool, purposes: &[&str]| DataElement {
            data_element: name.to_string(),
            data_element_title: title.to_string(),
            data_element_description: format!("One line description of {title} field"),
            data_element_collection_status: default_status(),
            expiry: 90,
            cross_border: false,
            sensitive,
            encrypted: sensitive,
            retention_period: 365,
            data_owner: vec!["Customer Service Department".to_string()],
            legal_basis: "consent".to_string(),
            purposes: purposes
                .iter()
                .map(|d| concur_core::Purpose {
                    purpose_id: String::new(),
                    purpose_description: d.to_string(),
                    purpose_language: "english".to_string(),
                })
                .collect(),
        };

        Self::new(
            organisation_id,
            vec![ManifestApplication {
                application_id: "your-application-id".to_string(),
                app_type: "mobile app".to_string(),
                name: "Your Application".to_string(),
                stage: "development".to_string(),
                application_user: "global".to_string(),
                collection_points: vec![ManifestCollectionPoint {
                    cp_id: "000000000000000000000000".to_string(),
                    cp_name: "Collection Point 1".to_string(),
                    cp_status: default_status(),
                    cp_url: "demo.api.com/000000000000000000000000".to_string(),
                    data_elements: vec![
                        element(
                            "home_address",
                            "Home Address",
                            true,
                            &["Delivery of purchased goods", "Fraud prevention"],
                        ),
                        element("phone_number", "Phone Number", false, &["Order status updates"]),
                    ],
                }],
            }],
        )
    }
}

impl From<&ApplicationRecord> for ManifestApplication {
    fn from(app: &ApplicationRecord) -> Self {
        Self {
            application_id: app.app_id.clone(),
            app_type: app.app_type.as_str().to_string(),
            name: app.app_name.clone(),
            stage: app.app_stage.as_str().to_string(),
            application_user: app.application_user.as_str().to_string(),
            collection_points: Vec::new(),
        }
    }
}

impl From<&CollectionPointRecord> for ManifestCollectionPoint {
    fn from(cp: &CollectionPointRecord) -> Self {
        Self {
            cp_id: cp.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            cp_name: cp.cp_name.clone(),
            cp_status: cp.cp_status.clone(),
            cp_url: cp.cp_url.clone(),
            data_elements: cp.data_elements.clone(),
        }
    }
}
