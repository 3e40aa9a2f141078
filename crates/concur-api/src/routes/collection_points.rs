//! # Collection Points
//!
//! Create, list and delete collection points. Create and delete write both
//! the store and the organisation manifest while holding the organisation's
//! manifest lock; the two writes are not atomic.
//!
//! ## Endpoints
//!
//! - `POST /create-collection-point`
//! - `GET /get-collection-points/{app_id}`
//! - `DELETE /delete-collection-point/{collection_point_id}`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use concur_core::{CollectionPointRecord, DataElement, DocumentId, OrgCredentials};
use concur_manifest::ManifestCollectionPoint;

use crate::auth::require_authorized;
use crate::db;
use crate::error::AppError;
use crate::extractors::{extract_json, require_non_empty, HeaderCredentials};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCollectionPointRequest {
    pub org_id: String,
    pub app_id: String,
    pub org_key: String,
    pub org_secret: String,
    pub cp_name: String,
    #[serde(default)]
    pub data_elements: Vec<DataElement>,
}

/// A collection point as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CollectionPointData {
    pub cp_id: String,
    pub cp_name: String,
    pub cp_status: String,
    pub cp_url: String,
    pub data_elements: Vec<DataElement>,
}

impl From<&CollectionPointRecord> for CollectionPointData {
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

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCollectionPointResponse {
    pub message: String,
    pub collection_point_data: CollectionPointData,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CollectionPointList {
    pub collection_points: Vec<CollectionPointRecord>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-collection-point", post(create_collection_point))
        .route("/get-collection-points/{app_id}", get(get_collection_points))
        .route(
            "/delete-collection-point/{collection_point_id}",
            delete(delete_collection_point),
        )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /create-collection-point: Declare a new collection point.
///
/// Inserts the record, derives its URL from the assigned id, then appends
/// it to the matching application in the manifest. If the manifest has no
/// such application the store record is kept without a manifest entry and
/// the divergence is logged.
#[utoipa::path(
    post,
    path = "/create-collection-point",
    request_body = CreateCollectionPointRequest,
    responses(
        (status = 200, description = "Collection point created", body = CreateCollectionPointResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
        (status = 500, description = "Store or manifest failure", body = crate::error::ErrorBody),
    ),
    tag = "collection-points"
)]
pub async fn create_collection_point(
    State(state): State<AppState>,
    body: Result<Json<CreateCollectionPointRequest>, JsonRejection>,
) -> Result<Json<CreateCollectionPointResponse>, AppError> {
    let req = extract_json(body)?;
    let creds = OrgCredentials::new(&req.org_id, &req.org_key, &req.org_secret);
    require_authorized(state.store(), &creds).await?;
    require_non_empty("cp_name", &req.cp_name)?;

    let mut record =
        CollectionPointRecord::new(&req.org_id, &req.app_id, &req.cp_name, req.data_elements);

    let _guard = state.manifests.lock(&req.org_id).await;
    let cp_id = db::collection_points::insert(state.store(), &record).await?;
    let cp_url = CollectionPointRecord::url_for(&cp_id);
    db::collection_points::set_url(state.store(), &cp_id, &cp_url).await?;
    record.id = Some(cp_id.clone());
    record.cp_url = cp_url;

    let appended = state
        .manifests
        .append_collection_point(&req.org_id, &req.app_id, ManifestCollectionPoint::from(&record))
        .await?;
    if appended {
        tracing::info!(org_id = %req.org_id, app_id = %req.app_id, %cp_id, "collection point created");
    } else {
        tracing::warn!(
            org_id = %req.org_id,
            app_id = %req.app_id,
            %cp_id,
            "application missing from manifest; collection point stored without manifest entry"
        );
    }

    Ok(Json(CreateCollectionPointResponse {
        message: format!("Collection point with id {cp_id} created successfully"),
        collection_point_data: CollectionPointData::from(&record),
    }))
}

/// GET /get-collection-points/{app_id}: List an application's collection points.
#[utoipa::path(
    get,
    path = "/get-collection-points/{app_id}",
    params(
        ("app_id" = String, Path, description = "Application id"),
        ("org-id" = String, Header, description = "Organisation id"),
        ("org-key" = String, Header, description = "Organisation key"),
        ("org-secret" = String, Header, description = "Organisation secret"),
    ),
    responses(
        (status = 200, description = "Collection points", body = CollectionPointList),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
        (status = 404, description = "No collection points", body = crate::error::ErrorBody),
    ),
    tag = "collection-points"
)]
pub async fn get_collection_points(
    State(state): State<AppState>,
    Path(app_id): Path<String>,
    HeaderCredentials(creds): HeaderCredentials,
) -> Result<Json<CollectionPointList>, AppError> {
    require_authorized(state.store(), &creds).await?;

    let collection_points =
        db::collection_points::list_for_app(state.store(), &creds.org_id, &app_id).await?;
    if collection_points.is_empty() {
        return Err(AppError::NotFound("No collection points found".into()));
    }

    Ok(Json(CollectionPointList { collection_points }))
}

/// DELETE /delete-collection-point/{collection_point_id}: Remove a collection point.
///
/// The store is mutated first. Only when a record was actually deleted is
/// the manifest read and every entry with the same id spliced out.
#[utoipa::path(
    delete,
    path = "/delete-collection-point/{collection_point_id}",
    params(
        ("collection_point_id" = String, Path, description = "24-character hex id"),
        ("org-id" = String, Header, description = "Organisation id"),
        ("org-key" = String, Header, description = "Organisation key"),
        ("org-secret" = String, Header, description = "Organisation secret"),
    ),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = crate::error::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "collection-points"
)]
pub async fn delete_collection_point(
    State(state): State<AppState>,
    Path(collection_point_id): Path<String>,
    HeaderCredentials(creds): HeaderCredentials,
) -> Result<Json<MessageResponse>, AppError> {
    require_authorized(state.store(), &creds).await?;
    let cp_id = DocumentId::parse(&collection_point_id)?;

    let _guard = state.manifests.lock(&creds.org_id).await;
    let deleted = db::collection_points::delete(state.store(), &cp_id, &creds.org_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Collection point not found".into()));
    }

    // Manifest entries match the path id verbatim, not the normalised id.
    let removed = state
        .manifests
        .remove_collection_point(&creds.org_id, &collection_point_id)
        .await?;
    if removed == 0 {
        tracing::warn!(org_id = %creds.org_id, %cp_id, "deleted collection point had no manifest entry");
    }

    Ok(Json(MessageResponse {
        message: "Collection point deleted successfully".into(),
    }))
}

