//! # Organisation Authorization
//!
//! Every organisation-scoped endpoint presents the `(org_id, org_key,
//! org_secret)` triple issued at registration. A request is authorized when
//! at least one developer record carries exactly that triple. The
//! comparison happens inside the store.
//!
//! A failed check and a failed *query* are kept apart: the first is the
//! caller's problem (401), the second is ours (500).

use concur_core::OrgCredentials;
use concur_store::{DocumentStore, StoreError};

use crate::db;
use crate::error::AppError;

/// Result of checking organisation credentials.
#[derive(Debug)]
pub enum AuthOutcome {
    Authorized,
    Unauthorized,
    /// The store could not answer.
    CheckFailed(StoreError),
}

/// Check credentials against stored developer records.
pub async fn authorize(store: &dyn DocumentStore, creds: &OrgCredentials) -> AuthOutcome {
    match db::developers::count_matching(store, creds).await {
        Ok(0) => AuthOutcome::Unauthorized,
        Ok(_) => AuthOutcome::Authorized,
        Err(e) => AuthOutcome::CheckFailed(e),
    }
}

/// [`authorize`], mapped to handler errors.
pub async fn require_authorized(
    store: &dyn DocumentStore,
    creds: &OrgCredentials,
) -> Result<(), AppError> {
    match authorize(store, creds).await {
        AuthOutcome::Authorized => Ok(()),
        AuthOutcome::Unauthorized => {
            tracing::warn!(org_id = %creds.org_id, "organisation credentials rejected");
            Err(AppError::Unauthorized("Invalid org_key or org_secret".into()))
        }
        AuthOutcome::CheckFailed(e) => {
            Err(AppError::Internal(format!("credential check failed: {e}")))
        }
    }
}
