//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs, helpers to extract and
//! validate JSON bodies, and extractors for organisation credentials sent
//! as headers (with query-string fallback).

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, FromRequestParts, Query};
use axum::http::request::Parts;
use axum::Json;

use concur_core::{OrgCredentials, ValidationError};

use crate::error::AppError;

/// Request types that check business rules beyond what serde checks.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate()?;
    Ok(value)
}

/// Reject empty or whitespace-only required strings.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

/// Look up `header`, falling back to the `query_key` query parameter.
fn header_or_query(
    parts: &Parts,
    query: &HashMap<String, String>,
    header: &str,
    query_key: &str,
) -> Option<String> {
    parts
        .headers
        .get(header)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| query.get(query_key).cloned())
}

fn query_params(parts: &Parts) -> HashMap<String, String> {
    Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(q)| q)
        .unwrap_or_default()
}

/// Organisation credentials from `org-id`/`org-key`/`org-secret` headers,
/// or `org_id`/`org_key`/`org_secret` query parameters.
#[derive(Debug, Clone)]
pub struct HeaderCredentials(pub OrgCredentials);

impl<S: Send + Sync> FromRequestParts<S> for HeaderCredentials {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = query_params(parts);
        let field = |header: &str, key: &str| {
            header_or_query(parts, &query, header, key).ok_or_else(|| {
                AppError::Unauthorized(format!("missing {header} header or {key} query parameter"))
            })
        };
        Ok(Self(OrgCredentials {
            org_id: field("org-id", "org_id")?,
            org_key: field("org-key", "org_key")?,
            org_secret: field("org-secret", "org_secret")?,
        }))
    }
}

/// Application id from the `app-id` header or `app_id` query parameter.
#[derive(Debug, Clone)]
pub struct AppIdHeader(pub String);

impl<S: Send + Sync> FromRequestParts<S> for AppIdHeader {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = query_params(parts);
        header_or_query(parts, &query, "app-id", "app_id")
            .map(Self)
            .ok_or_else(|| AppError::BadRequest("missing app-id header or app_id query parameter".into()))
    }
}

/// Best-effort client address: first `X-Forwarded-For` hop, then the
/// socket peer, then `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn from_parts(parts: &Parts) -> Self {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let peer = || {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        };
        Self(forwarded.or_else(peer).unwrap_or_else(|| "unknown".to_string()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<HeaderCredentials, AppError> {
        let (mut parts, _) = req.into_parts();
        HeaderCredentials::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn credentials_from_headers() {
        let req = Request::builder()
            .uri("/x")
            .header("org-id", "o")
            .header("org-key", "k")
            .header("org-secret", "s")
            .body(())
            .unwrap();
        let HeaderCredentials(creds) = extract(req).await.unwrap();
        assert_eq!(creds, OrgCredentials::new("o", "k", "s"));
    }

    #[tokio::test]
    async fn credentials_fall_back_to_query() {
        let req = Request::builder()
            .uri("/x?org_id=o&org_key=k&org_secret=s")
            .header("org-key", "from-header")
            .body(())
            .unwrap();
        let HeaderCredentials(creds) = extract(req).await.unwrap();
        assert_eq!(creds, OrgCredentials::new("o", "from-header", "s"));
    }

    #[tokio::test]
    async fn missing_credentials_unauthorized() {
        let req = Request::builder().uri("/x?org_id=o").body(()).unwrap();
        assert!(matches!(extract(req).await, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn client_ip_prefers_forwarded_header() {
        let (parts, _) = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(ClientIp::from_parts(&parts).0, "203.0.113.7");

        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert_eq!(ClientIp::from_parts(&parts).0, "unknown");
    }

    #[test]
    fn empty_field_rejected() {
        assert_eq!(require_non_empty("cp_name", "  "), Err(ValidationError::EmptyField("cp_name")));
        assert!(require_non_empty("cp_name", "signup").is_ok());
    }
}
