//! # Consent Preferences
//!
//! `POST /post-consent-preference` records a data principal's decisions for
//! one collection point. There is at most one record per
//! `(dp_id, cp_id)`; a repeat post replaces it.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use concur_core::{ConsentRecord, ConsentScopeEntry, DocumentId, OrgCredentials, ValidationError};

use crate::auth::require_authorized;
use crate::db;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, require_non_empty, Validate};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConsentPreferenceRequest {
    pub org_id: String,
    pub org_key: String,
    pub org_secret: String,
    pub cp_id: String,
    pub dp_id: String,
    pub dp_email_hash: String,
    pub consent_scope: Vec<ConsentScopeEntry>,
}

impl Validate for ConsentPreferenceRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("dp_id", &self.dp_id)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConsentPreferenceResponse {
    pub message: String,
    pub agreement_id: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/post-consent-preference", post(post_consent_preference))
}

/// Ensure every scope entry names a data element the collection point declares.
fn check_scope(
    declared: &concur_core::CollectionPointRecord,
    scope: &[ConsentScopeEntry],
) -> Result<(), ValidationError> {
    match scope
        .iter()
        .find(|entry| !declared.declares_data_element(&entry.data_element_name))
    {
        Some(entry) => Err(ValidationError::UnknownDataElement(entry.data_element_name.clone())),
        None => Ok(()),
    }
}

/// POST /post-consent-preference: Create or replace a consent record.
#[utoipa::path(
    post,
    path = "/post-consent-preference",
    request_body = ConsentPreferenceRequest,
    responses(
        (status = 200, description = "Consent recorded", body = ConsentPreferenceResponse),
        (status = 400, description = "Malformed id or unknown data element", body = crate::error::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
        (status = 404, description = "Collection point not found", body = crate::error::ErrorBody),
    ),
    tag = "consent"
)]
pub async fn post_consent_preference(
    State(state): State<AppState>,
    body: Result<Json<ConsentPreferenceRequest>, JsonRejection>,
) -> Result<Json<ConsentPreferenceResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let creds = OrgCredentials::new(&req.org_id, &req.org_key, &req.org_secret);
    require_authorized(state.store(), &creds).await?;
    let cp_id = DocumentId::parse(&req.cp_id)?;

    let cp = db::collection_points::find(state.store(), &cp_id, Some(&req.org_id), None)
        .await?
        .ok_or_else(|| AppError::NotFound("Collection point not found".into()))?;

    if state.config.consent_scope_validation {
        check_scope(&cp, &req.consent_scope)?;
    }

    let record = ConsentRecord::new(
        cp.cp_name,
        req.dp_id,
        cp_id.to_string(),
        req.dp_email_hash,
        req.consent_scope,
    );
    let (agreement_id, created) = db::consents::upsert(state.store(), &record).await?;

    tracing::info!(
        org_id = %req.org_id,
        %cp_id,
        %agreement_id,
        created,
        "consent preference recorded"
    );

    let message = if created {
        "Consent preferences created successfully"
    } else {
        "Consent preferences updated successfully"
    };
    Ok(Json(ConsentPreferenceResponse {
        message: message.into(),
        agreement_id: agreement_id.to_string(),
    }))
}
