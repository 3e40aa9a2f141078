//! # Manifest Endpoints
//!
//! - `GET /collection-point-template` returns a sample manifest.
//! - `POST /push-yaml` applies an uploaded manifest to existing collection
//!   points.
//! - `POST /rebuild-manifest` regenerates the organisation manifest from
//!   the store.

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use concur_core::{DocumentId, OrgCredentials};
use concur_manifest::{ManifestCollectionPoint, ManifestDocument};

use crate::auth::require_authorized;
use crate::db;
use crate::db::collection_points::CollectionPointPatch;
use crate::error::AppError;
use crate::extractors::HeaderCredentials;
use crate::state::AppState;

const YAML_CONTENT_TYPE: &str = "application/x-yaml";

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Multipart form accepted by `POST /push-yaml`.
#[derive(Debug, ToSchema)]
pub struct PushYamlForm {
    pub org_id: String,
    pub app_id: String,
    pub org_key: String,
    pub org_secret: String,
    #[schema(value_type = String, format = Binary)]
    pub yaml_file: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ManifestResponse {
    pub message: String,
    #[schema(value_type = Object)]
    pub yaml_data: ManifestDocument,
}

/// Text fields and file collected from a push-yaml upload.
#[derive(Debug, Default)]
struct PushYamlUpload {
    org_id: Option<String>,
    app_id: Option<String>,
    org_key: Option<String>,
    org_secret: Option<String>,
    yaml_file: Option<String>,
}

impl PushYamlUpload {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let bad = |err: axum::extract::multipart::MultipartError| AppError::BadRequest(err.body_text());
        let mut upload = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(bad)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "yaml_file" => {
                    let bytes = field.bytes().await.map_err(bad)?;
                    let text = String::from_utf8(bytes.to_vec())
                        .map_err(|_| AppError::BadRequest("yaml_file is not valid UTF-8".into()))?;
                    upload.yaml_file = Some(text);
                }
                "org_id" => upload.org_id = Some(field.text().await.map_err(bad)?),
                "app_id" => upload.app_id = Some(field.text().await.map_err(bad)?),
                "org_key" => upload.org_key = Some(field.text().await.map_err(bad)?),
                "org_secret" => upload.org_secret = Some(field.text().await.map_err(bad)?),
                other => tracing::debug!(field = other, "ignoring unknown multipart field"),
            }
        }
        Ok(upload)
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::BadRequest(format!("missing form field {name}")))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/collection-point-template", get(collection_point_template))
        .route("/push-yaml", post(push_yaml))
        .route("/rebuild-manifest", post(rebuild_manifest))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /collection-point-template: Sample manifest for the caller's organisation.
#[utoipa::path(
    get,
    path = "/collection-point-template",
    params(
        ("org-id" = String, Header, description = "Organisation id"),
        ("org-key" = String, Header, description = "Organisation key"),
        ("org-secret" = String, Header, description = "Organisation secret"),
    ),
    responses(
        (status = 200, description = "Sample manifest", body = String, content_type = "application/x-yaml"),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    ),
    tag = "manifests"
)]
pub async fn collection_point_template(
    State(state): State<AppState>,
    HeaderCredentials(creds): HeaderCredentials,
) -> Result<impl IntoResponse, AppError> {
    require_authorized(state.store(), &creds).await?;
    let yaml = ManifestDocument::template(&creds.org_id).to_yaml()?;
    Ok(([(header::CONTENT_TYPE, YAML_CONTENT_TYPE)], yaml))
}

/// POST /push-yaml: Apply an uploaded manifest to stored collection points.
///
/// Only applications whose id equals the form's `app_id` are considered.
/// Every referenced collection point must already exist for the
/// organisation; all ids are checked before any record is overwritten.
/// The manifest file on disk is left untouched.
#[utoipa::path(
    post,
    path = "/push-yaml",
    request_body(content = PushYamlForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Collection points updated", body = ManifestResponse),
        (status = 400, description = "Malformed form, YAML or id", body = crate::error::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
        (status = 404, description = "Referenced collection point missing", body = crate::error::ErrorBody),
    ),
    tag = "manifests"
)]
pub async fn push_yaml(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ManifestResponse>, AppError> {
    let multipart = multipart.map_err(|err| AppError::BadRequest(err.body_text()))?;
    let upload = PushYamlUpload::read(multipart).await?;

    let creds = OrgCredentials::new(
        required(upload.org_id, "org_id")?,
        required(upload.org_key, "org_key")?,
        required(upload.org_secret, "org_secret")?,
    );
    let app_id = required(upload.app_id, "app_id")?;
    let yaml = required(upload.yaml_file, "yaml_file")?;
    require_authorized(state.store(), &creds).await?;

    let manifest = ManifestDocument::from_yaml(&yaml)?;
    if manifest.organisation_id != creds.org_id {
        return Err(AppError::BadRequest(format!(
            "manifest organisation_id {} does not match org_id {}",
            manifest.organisation_id, creds.org_id
        )));
    }

    let mut targets: Vec<(DocumentId, &ManifestCollectionPoint)> = Vec::new();
    for app in manifest.applications_with_id(&app_id) {
        for cp in &app.collection_points {
            if cp.cp_id.is_empty() {
                return Err(AppError::BadRequest(format!(
                    "collection point {:?} has no cp_id",
                    cp.cp_name
                )));
            }
            targets.push((DocumentId::parse(&cp.cp_id)?, cp));
        }
    }

    let _guard = state.manifests.lock(&creds.org_id).await;
    for (id, _) in &targets {
        if db::collection_points::find(state.store(), id, Some(&creds.org_id), None)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "Collection point {id} not found. Please create it first."
            )));
        }
    }

    let mut modified = 0;
    for (id, cp) in &targets {
        let patch = CollectionPointPatch {
            cp_name: &cp.cp_name,
            cp_status: &cp.cp_status,
            cp_url: &cp.cp_url,
            data_elements: &cp.data_elements,
        };
        modified += db::collection_points::overwrite(state.store(), id, patch).await?.modified;
    }

    tracing::info!(
        org_id = %creds.org_id,
        %app_id,
        matched = targets.len(),
        modified,
        "manifest pushed"
    );

    Ok(Json(ManifestResponse {
        message: "YAML file updated successfully".into(),
        yaml_data: manifest,
    }))
}

/// POST /rebuild-manifest: Regenerate the manifest from stored records.
///
/// Repairs divergence left behind by a failed manifest write. Collection
/// points whose application is not stored are dropped from the result.
#[utoipa::path(
    post,
    path = "/rebuild-manifest",
    params(
        ("org-id" = String, Header, description = "Organisation id"),
        ("org-key" = String, Header, description = "Organisation key"),
        ("org-secret" = String, Header, description = "Organisation secret"),
    ),
    responses(
        (status = 200, description = "Manifest rebuilt", body = ManifestResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    ),
    tag = "manifests"
)]
pub async fn rebuild_manifest(
    State(state): State<AppState>,
    HeaderCredentials(creds): HeaderCredentials,
) -> Result<Json<ManifestResponse>, AppError> {
    require_authorized(state.store(), &creds).await?;

    let _guard = state.manifests.lock(&creds.org_id).await;
    let applications = db::applications::list_for_org(state.store(), &creds.org_id).await?;
    let collection_points = db::collection_points::list_for_org(state.store(), &creds.org_id).await?;
    let manifest = state
        .manifests
        .rebuild(&creds.org_id, &applications, &collection_points)
        .await?;

    tracing::info!(
        org_id = %creds.org_id,
        applications = applications.len(),
        collection_points = collection_points.len(),
        "manifest rebuilt"
    );

    Ok(Json(ManifestResponse {
        message: "Manifest rebuilt from stored records".into(),
        yaml_data: manifest,
    }))
}
