//! # Developer Registration & Applications
//!
//! - `POST /package-register` issues organisation credentials.
//! - `POST /create-application` registers an application and resets the
//!   organisation manifest to contain just that application.

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use concur_core::generate::{self, APP_ID_LEN, ORG_KEY_LEN, ORG_SECRET_LEN};
use concur_core::{
    AppStage, AppType, ApplicationRecord, ApplicationUser, DeveloperRecord, OrganisationRecord,
    ValidationError,
};
use concur_manifest::{ManifestApplication, ManifestDocument};

use crate::auth::require_authorized;
use crate::db;
use crate::error::AppError;
use crate::extractors::{
    extract_json, extract_validated_json, require_non_empty, ClientIp, HeaderCredentials, Validate,
};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Developer sign-up details.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
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
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("developer_email", &self.developer_email)?;
        require_non_empty("organisation_name", &self.organisation_name)
    }
}

/// Issued organisation credentials. The secret is shown only here.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub con_org_id: String,
    pub con_org_key: String,
    pub con_org_secret: String,
}

/// Application details. Enumerated fields are checked after authorization
/// so a bad credential is reported before a bad value.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateApplicationRequest {
    /// One of `web app`, `mobile app`, `ctv`, `pos`, `other`.
    pub app_type: String,
    pub app_name: String,
    /// One of `development`, `testing`, `production`.
    pub app_stage: String,
    /// One of `global`, `india`, `eu`, `usa`, `saudi arabia`.
    pub application_user: String,
}

impl CreateApplicationRequest {
    fn parse(&self) -> Result<(AppType, AppStage, ApplicationUser), ValidationError> {
        require_non_empty("app_name", &self.app_name)?;
        Ok((
            self.app_type.parse()?,
            self.app_stage.parse()?,
            self.application_user.parse()?,
        ))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateApplicationResponse {
    /// The freshly written manifest.
    #[schema(value_type = Object)]
    pub yaml_data: ManifestDocument,
    pub con_app_id: String,
    pub app_type: AppType,
    pub app_name: String,
    pub app_stage: AppStage,
    pub application_user: ApplicationUser,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/package-register", post(package_register))
        .route("/create-application", post(create_application))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Request headers as name → comma-joined values.
fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        out.entry(name.as_str().to_string())
            .and_modify(|v| {
                v.push(',');
                v.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    out
}

/// POST /package-register: Register a developer and their organisation.
///
/// Writes the developer record, then the organisation record pointing back
/// at it, then patches the developer with the organisation id. A failure
/// part way leaves the earlier records in place.
#[utoipa::path(
    post,
    path = "/package-register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Organisation registered", body = RegisterResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 422, description = "Missing required field", body = crate::error::ErrorBody),
    ),
    tag = "registration"
)]
pub async fn package_register(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    headers: HeaderMap,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let store = state.store();

    let org_key = generate::url_safe_token(ORG_KEY_LEN);
    let org_secret = generate::alphanumeric(ORG_SECRET_LEN);
    let now = Utc::now();

    let developer = DeveloperRecord {
        id: None,
        developer_email: req.developer_email,
        developer_website: req.developer_website,
        developer_city: req.developer_city,
        developer_mobile: req.developer_mobile,
        organisation_name: req.organisation_name,
        contact_consent: req.contact_consent,
        org_key,
        org_secret,
        registered_at: now,
        client_ip,
        headers: collect_headers(&headers),
        organisation_id: None,
    };
    let developer_id = db::developers::insert_developer(store, &developer).await?;

    let organisation = OrganisationRecord {
        id: None,
        organisation_name: developer.organisation_name.clone(),
        developer_email: developer.developer_email.clone(),
        developer_details_id: developer_id.to_string(),
        registered_at: now,
    };
    let org_id = db::developers::insert_organisation(store, &organisation).await?;

    if !db::developers::link_organisation(store, &developer_id, &org_id).await? {
        return Err(AppError::Internal(format!(
            "developer {developer_id} vanished before organisation link"
        )));
    }

    tracing::info!(%org_id, %developer_id, "organisation registered");

    Ok(Json(RegisterResponse {
        con_org_id: org_id.to_string(),
        con_org_key: developer.org_key,
        con_org_secret: developer.org_secret,
    }))
}

/// POST /create-application: Register an application.
///
/// The organisation manifest is overwritten with a document holding only
/// this application, discarding anything recorded for earlier ones.
#[utoipa::path(
    post,
    path = "/create-application",
    request_body = CreateApplicationRequest,
    params(
        ("org-id" = String, Header, description = "Organisation id"),
        ("org-key" = String, Header, description = "Organisation key"),
        ("org-secret" = String, Header, description = "Organisation secret"),
    ),
    responses(
        (status = 200, description = "Application created", body = CreateApplicationResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
        (status = 422, description = "Value outside accepted set", body = crate::error::ErrorBody),
    ),
    tag = "registration"
)]
pub async fn create_application(
    State(state): State<AppState>,
    HeaderCredentials(creds): HeaderCredentials,
    body: Result<Json<CreateApplicationRequest>, JsonRejection>,
) -> Result<Json<CreateApplicationResponse>, AppError> {
    let req = extract_json(body)?;
    require_authorized(state.store(), &creds).await?;
    let (app_type, app_stage, application_user) = req.parse()?;

    let record = ApplicationRecord {
        id: None,
        org_id: creds.org_id.clone(),
        app_id: generate::uuid_derived(APP_ID_LEN),
        app_type,
        app_name: req.app_name,
        app_stage,
        application_user,
        registered_at: Utc::now(),
    };

    let _guard = state.manifests.lock(&creds.org_id).await;
    db::applications::insert(state.store(), &record).await?;
    let manifest = state
        .manifests
        .initialize(&creds.org_id, ManifestApplication::from(&record))
        .await?;

    tracing::info!(org_id = %creds.org_id, app_id = %record.app_id, "application created");

    Ok(Json(CreateApplicationResponse {
        yaml_data: manifest,
        con_app_id: record.app_id,
        app_type,
        app_name: record.app_name,
        app_stage,
        application_user,
    }))
}
