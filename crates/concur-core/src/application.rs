//! # Applications
//!
//! An application belongs to exactly one organisation and is never updated
//! or deleted. Its type, stage and audience are closed enumerations whose
//! serialized spelling is the public API spelling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::identity::DocumentId;

/// Platform the application runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum AppType {
    #[serde(rename = "web app")]
    WebApp,
    #[serde(rename = "mobile app")]
    MobileApp,
    #[serde(rename = "ctv")]
    Ctv,
    #[serde(rename = "pos")]
    Pos,
    #[serde(rename = "other")]
    Other,
}

impl AppType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebApp => "web app",
            Self::MobileApp => "mobile app",
            Self::Ctv => "ctv",
            Self::Pos => "pos",
            Self::Other => "other",
        }
    }
}

/// Release stage of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppStage {
    Development,
    Testing,
    Production,
}

impl AppStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Testing => "testing",
            Self::Production => "production",
        }
    }
}

/// Regulatory audience of the application's users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ApplicationUser {
    #[serde(rename = "global")]
    Global,
    #[serde(rename = "india")]
    India,
    #[serde(rename = "eu")]
    Eu,
    #[serde(rename = "usa")]
    Usa,
    #[serde(rename = "saudi arabia")]
    SaudiArabia,
}

impl ApplicationUser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::India => "india",
            Self::Eu => "eu",
            Self::Usa => "usa",
            Self::SaudiArabia => "saudi arabia",
        }
    }
}

/// Display and parsing share the serialized spelling. Parsing is exact:
/// no case folding or trimming.
macro_rules! api_enum {
    ($ty:ty, $field:literal, [$($variant:expr),+ $(,)?]) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($variant),+];
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| ValidationError::NotInEnumeration {
                        field: $field,
                        value: s.to_string(),
                        allowed: Self::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

api_enum!(
    AppType,
    "app_type",
    [AppType::WebApp, AppType::MobileApp, AppType::Ctv, AppType::Pos, AppType::Other]
);
api_enum!(
    AppStage,
    "app_stage",
    [AppStage::Development, AppStage::Testing, AppStage::Production]
);
api_enum!(
    ApplicationUser,
    "application_user",
    [
        ApplicationUser::Global,
        ApplicationUser::India,
        ApplicationUser::Eu,
        ApplicationUser::Usa,
        ApplicationUser::SaudiArabia,
    ]
);

/// Stored application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApplicationRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<DocumentId>,
    pub org_id: String,
    /// Generated application id (not the store id).
    pub app_id: String,
    pub app_type: AppType,
    pub app_name: String,
    pub app_stage: AppStage,
    pub application_user: ApplicationUser,
    pub registered_at: DateTime<Utc>,
}
