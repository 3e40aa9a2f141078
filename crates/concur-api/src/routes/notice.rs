//! # Consent Notices
//!
//! `GET /get-notice-info/{cp_id}` renders the localized notice for a stored
//! collection point.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use concur_core::notice::{self, NoticeInfo};
use concur_core::DocumentId;

use crate::auth::require_authorized;
use crate::db;
use crate::error::AppError;
use crate::extractors::{AppIdHeader, HeaderCredentials};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeResponse {
    /// `urls` plus one entry per supported language.
    #[schema(value_type = Object)]
    pub notice_info: NoticeInfo,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/get-notice-info/{cp_id}", get(get_notice_info))
}

/// GET /get-notice-info/{cp_id}: Localized notice for a collection point.
///
/// The collection point must belong to both the caller's organisation and
/// the application named by `app-id`.
#[utoipa::path(
    get,
    path = "/get-notice-info/{cp_id}",
    params(
        ("cp_id" = String, Path, description = "24-character hex id"),
        ("org-id" = String, Header, description = "Organisation id"),
        ("org-key" = String, Header, description = "Organisation key"),
        ("org-secret" = String, Header, description = "Organisation secret"),
        ("app-id" = String, Header, description = "Application id"),
    ),
    responses(
        (status = 200, description = "Rendered notice", body = NoticeResponse),
        (status = 400, description = "Malformed id", body = crate::error::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
        (status = 404, description = "Collection point not found", body = crate::error::ErrorBody),
    ),
    tag = "notices"
)]
pub async fn get_notice_info(
    State(state): State<AppState>,
    Path(cp_id): Path<String>,
    HeaderCredentials(creds): HeaderCredentials,
    AppIdHeader(app_id): AppIdHeader,
) -> Result<Json<NoticeResponse>, AppError> {
    require_authorized(state.store(), &creds).await?;
    let id = DocumentId::parse(&cp_id)?;

    let cp = db::collection_points::find(state.store(), &id, Some(&creds.org_id), Some(&app_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Collection point with ID {cp_id} not found")))?;

    Ok(Json(NoticeResponse {
        notice_info: notice::render(&cp),
    }))
}
