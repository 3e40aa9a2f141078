//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI 3.1 spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Concur Consent Registry API",
        version = "0.1.0",
        description = "Developer registration, applications, collection points, manifests, consent notices and consent preferences."
    ),
    paths(
        // Registration
        crate::routes::registration::package_register,
        crate::routes::registration::create_application,
        // Collection points
        crate::routes::collection_points::create_collection_point,
        crate::routes::collection_points::get_collection_points,
        crate::routes::collection_points::delete_collection_point,
        // Manifests
        crate::routes::manifests::collection_point_template,
        crate::routes::manifests::push_yaml,
        crate::routes::manifests::rebuild_manifest,
        // Notices
        crate::routes::notice::get_notice_info,
        // Consent
        crate::routes::consent::post_consent_preference,
    ),
    components(schemas(
        // Records
        concur_core::AppType,
        concur_core::AppStage,
        concur_core::ApplicationUser,
        concur_core::CollectionPointRecord,
        concur_core::DataElement,
        concur_core::Purpose,
        concur_core::ConsentScopeEntry,
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // Registration DTOs
        crate::routes::registration::RegisterRequest,
        crate::routes::registration::RegisterResponse,
        crate::routes::registration::CreateApplicationRequest,
        crate::routes::registration::CreateApplicationResponse,
        // Collection point DTOs
        crate::routes::collection_points::CreateCollectionPointRequest,
        crate::routes::collection_points::CreateCollectionPointResponse,
        crate::routes::collection_points::CollectionPointData,
        crate::routes::collection_points::CollectionPointList,
        crate::routes::collection_points::MessageResponse,
        // Manifest DTOs
        crate::routes::manifests::PushYamlForm,
        crate::routes::manifests::ManifestResponse,
        // Notice DTOs
        crate::routes::notice::NoticeResponse,
        // Consent DTOs
        crate::routes::consent::ConsentPreferenceRequest,
        crate::routes::consent::ConsentPreferenceResponse,
    )),
    tags(
        (name = "registration", description = "Developer and application registration"),
        (name = "collection-points", description = "Collection point declarations"),
        (name = "manifests", description = "Organisation YAML manifests"),
        (name = "notices", description = "Localized consent notices"),
        (name = "consent", description = "Data principal consent preferences"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
