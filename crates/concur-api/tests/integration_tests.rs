//! # Integration Tests for concur-api
//!
//! Drives the full router with `oneshot` against the in-memory store and a
//! temporary manifest directory. Covers registration, applications,
//! collection points and their manifest mirror, manifest upload and
//! rebuild, notices, consent preferences and the OpenAPI document.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use std::sync::Arc;

use concur_api::config::AppConfig;
use concur_api::state::AppState;
use concur_core::{CollectionPointRecord, DeveloperRecord, OrganisationRecord};
use concur_manifest::{ManifestCollectionPoint, ManifestDocument};
use concur_store::{from_document, Collection, Filter, MemoryStore};

// -- Helpers ------------------------------------------------------------------

struct Harness {
    app: Router,
    state: AppState,
    _dir: TempDir,
}

struct Creds {
    org_id: String,
    org_key: String,
    org_secret: String,
}

fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let state = AppState::in_memory(dir.path());
    Harness {
        app: concur_api::app(state.clone()),
        state,
        _dir: dir,
    }
}

fn harness_with(configure: impl FnOnce(&mut AppConfig)) -> Harness {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig {
        manifest_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    configure(&mut config);
    let state = AppState::new(Arc::new(MemoryStore::new()), config);
    Harness {
        app: concur_api::app(state.clone()),
        state,
        _dir: dir,
    }
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn send(h: &Harness, request: Request<Body>) -> (StatusCode, String) {
    let response = h.app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_string(response).await)
}

async fn send_json(h: &Harness, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(h, request).await;
    let value = serde_json::from_str(&body).unwrap_or(Value::String(body));
    (status, value)
}

fn with_creds(builder: axum::http::request::Builder, creds: &Creds) -> axum::http::request::Builder {
    builder
        .header("org-id", &creds.org_id)
        .header("org-key", &creds.org_key)
        .header("org-secret", &creds.org_secret)
}

fn post_json(uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
}

fn json_body(body: &Value) -> Body {
    Body::from(serde_json::to_string(body).unwrap())
}

async fn register(h: &Harness) -> Creds {
    let body = json!({
        "developer_email": "dev@example.com",
        "developer_website": "https://example.com",
        "developer_city": "Pune",
        "developer_mobile": "9999999999",
        "organisation_name": "Example Org",
        "contact_consent": true
    });
    let (status, v) = send_json(
        h,
        post_json("/package-register").body(json_body(&body)).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{v}");
    Creds {
        org_id: v["con_org_id"].as_str().unwrap().to_string(),
        org_key: v["con_org_key"].as_str().unwrap().to_string(),
        org_secret: v["con_org_secret"].as_str().unwrap().to_string(),
    }
}

async fn create_application(h: &Harness, creds: &Creds) -> String {
    let body = json!({
        "app_type": "web app",
        "app_name": "Storefront",
        "app_stage": "development",
        "application_user": "india"
    });
    let request = with_creds(post_json("/create-application"), creds)
        .body(json_body(&body))
        .unwrap();
    let (status, v) = send_json(h, request).await;
    assert_eq!(status, StatusCode::OK, "{v}");
    v["con_app_id"].as_str().unwrap().to_string()
}

fn cp_body(creds: &Creds, app_id: &str, cp_name: &str) -> Value {
    json!({
        "org_id": creds.org_id,
        "app_id": app_id,
        "org_key": creds.org_key,
        "org_secret": creds.org_secret,
        "cp_name": cp_name,
        "data_elements": [{
            "data_element": "email",
            "data_element_title": "Email",
            "data_element_description": "Contact email",
            "data_element_collection_status": "inactive",
            "expiry": 30,
            "cross_border": true,
            "sensitive": true,
            "encrypted": true,
            "retention_period": 365,
            "data_owner": ["Support"],
            "legal_basis": "consent",
            "purposes": [{
                "purpose_id": "client-chosen",
                "purpose_description": "Order updates",
                "purpose_language": "english"
            }]
        }]
    })
}

async fn create_collection_point(h: &Harness, creds: &Creds, app_id: &str, cp_name: &str) -> Value {
    let body = cp_body(creds, app_id, cp_name);
    let (status, v) = send_json(
        h,
        post_json("/create-collection-point").body(json_body(&body)).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{v}");
    v
}

async fn stored_collection_points(h: &Harness) -> Vec<CollectionPointRecord> {
    h.state
        .store()
        .find(Collection::CollectionPoints, &Filter::new())
        .await
        .unwrap()
        .into_iter()
        .map(|d| from_document(d).unwrap())
        .collect()
}

async fn manifest(h: &Harness, org_id: &str) -> ManifestDocument {
    h.state.manifests.read(org_id).await.unwrap()
}

const BOUNDARY: &str = "concur-test-boundary";

fn multipart_body(fields: &[(&str, &str)], yaml: &str) -> Body {
    let mut out = String::new();
    for (name, value) in fields {
        out.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    out.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"yaml_file\"; filename=\"manifest.yaml\"\r\n\
         Content-Type: application/x-yaml\r\n\r\n{yaml}\r\n--{BOUNDARY}--\r\n"
    ));
    Body::from(out)
}

fn push_yaml_request(creds: &Creds, app_id: &str, yaml: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/push-yaml")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(multipart_body(
            &[
                ("org_id", creds.org_id.as_str()),
                ("app_id", app_id),
                ("org_key", creds.org_key.as_str()),
                ("org_secret", creds.org_secret.as_str()),
            ],
            yaml,
        ))
        .unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let h = harness();
    let (status, body) = send(&h, Request::builder().uri("/health/liveness").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let h = harness();
    let (status, body) = send(&h, Request::builder().uri("/health/readiness").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ready");
}

#[tokio::test]
async fn test_root_welcome() {
    let h = harness();
    let (status, v) = send_json(&h, Request::builder().uri("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(v["message"].as_str().unwrap().starts_with("Welcome"));
}

#[tokio::test]
async fn test_metrics_without_recorder_is_not_found() {
    let h = harness();
    let (status, _) = send(&h, Request::builder().uri("/metrics").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// -- Registration -------------------------------------------------------------

#[tokio::test]
async fn test_register_links_developer_and_organisation() {
    let h = harness();
    let creds = register(&h).await;

    assert_eq!(creds.org_key.len(), 32);
    assert_eq!(creds.org_secret.len(), 48);

    let developers: Vec<DeveloperRecord> = h
        .state
        .store()
        .find(Collection::Developers, &Filter::new())
        .await
        .unwrap()
        .into_iter()
        .map(|d| from_document(d).unwrap())
        .collect();
    assert_eq!(developers.len(), 1);
    let developer = &developers[0];
    assert_eq!(developer.organisation_id.as_deref(), Some(creds.org_id.as_str()));
    assert_eq!(developer.client_ip, "unknown");
    assert_eq!(developer.headers["content-type"], "application/json");

    let organisation: OrganisationRecord = from_document(
        h.state
            .store()
            .find_one(Collection::Organisations, &Filter::new())
            .await
            .unwrap()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(organisation.id.unwrap().as_str(), creds.org_id);
    assert_eq!(
        organisation.developer_details_id,
        developer.id.as_ref().unwrap().as_str()
    );
}

#[tokio::test]
async fn test_register_requires_email() {
    let h = harness();
    let body = json!({ "developer_email": "", "organisation_name": "Org" });
    let (status, v) = send_json(
        &h,
        post_json("/package-register").body(json_body(&body)).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_malformed_json_is_bad_request() {
    let h = harness();
    let (status, v) = send_json(
        &h,
        Request::builder()
            .method("POST")
            .uri("/package-register")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"]["code"], "BAD_REQUEST");
}

// -- Applications -------------------------------------------------------------

#[tokio::test]
async fn test_create_application_writes_single_empty_application() {
    let h = harness();
    let creds = register(&h).await;
    let first = create_application(&h, &creds).await;
    let second = create_application(&h, &creds).await;
    assert_eq!(second.len(), 16);
    assert_ne!(first, second);

    let doc = manifest(&h, &creds.org_id).await;
    assert_eq!(doc.version, "1.0");
    assert_eq!(doc.organisation_id, creds.org_id);
    assert_eq!(doc.applications.len(), 1);
    assert_eq!(doc.applications[0].application_id, second);
    assert_eq!(doc.applications[0].app_type, "web app");
    assert!(doc.applications[0].collection_points.is_empty());
}

#[tokio::test]
async fn test_create_application_rejects_unknown_enum_value() {
    let h = harness();
    let creds = register(&h).await;
    let body = json!({
        "app_type": "desktop",
        "app_name": "Storefront",
        "app_stage": "development",
        "application_user": "india"
    });
    let request = with_creds(post_json("/create-application"), &creds)
        .body(json_body(&body))
        .unwrap();
    let (status, v) = send_json(&h, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(v["error"]["message"].as_str().unwrap().contains("app_type"));
}

#[tokio::test]
async fn test_credentials_accepted_from_query_string() {
    let h = harness();
    let creds = register(&h).await;
    let body = json!({
        "app_type": "ctv",
        "app_name": "Living room",
        "app_stage": "testing",
        "application_user": "global"
    });
    let uri = format!(
        "/create-application?org_id={}&org_key={}&org_secret={}",
        creds.org_id, creds.org_key, creds.org_secret
    );
    let (status, v) = send_json(&h, post_json(&uri).body(json_body(&body)).unwrap()).await;
    assert_eq!(status, StatusCode::OK, "{v}");
}

// -- Collection Points --------------------------------------------------------

#[tokio::test]
async fn test_collection_point_mirrored_in_store_and_manifest() {
    let h = harness();
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;
    let v = create_collection_point(&h, &creds, &app_id, "Checkout").await;

    let cp_id = v["collection_point_data"]["cp_id"].as_str().unwrap().to_string();
    assert_eq!(
        v["message"],
        format!("Collection point with id {cp_id} created successfully")
    );
    assert_eq!(v["collection_point_data"]["cp_url"], format!("demo.api.com/{cp_id}"));

    let stored = stored_collection_points(&h).await;
    assert_eq!(stored.len(), 1);
    let record = &stored[0];
    assert_eq!(record.id.as_ref().unwrap().as_str(), cp_id);
    assert_eq!(record.cp_status, "active");
    let element = &record.data_elements[0];
    assert_eq!(element.data_element_collection_status, "active");
    assert!(!element.cross_border && !element.sensitive && !element.encrypted);
    assert_eq!(element.purposes[0].purpose_id.len(), 16);
    assert_ne!(element.purposes[0].purpose_id, "client-chosen");

    let doc = manifest(&h, &creds.org_id).await;
    assert_eq!(
        doc.applications[0].collection_points,
        vec![ManifestCollectionPoint::from(record)]
    );
}

#[tokio::test]
async fn test_collection_point_for_unknown_application_is_stored_without_manifest_entry() {
    let h = harness();
    let creds = register(&h).await;
    create_application(&h, &creds).await;
    create_collection_point(&h, &creds, "not-in-manifest", "Orphan").await;

    assert_eq!(stored_collection_points(&h).await.len(), 1);
    let doc = manifest(&h, &creds.org_id).await;
    assert_eq!(doc.applications.len(), 1);
    assert!(doc.applications[0].collection_points.is_empty());
}

#[tokio::test]
async fn test_wrong_credentials_mutate_nothing() {
    let h = harness();
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;
    let before = manifest(&h, &creds.org_id).await;

    let bad = Creds {
        org_id: creds.org_id.clone(),
        org_key: creds.org_key.clone(),
        org_secret: "wrong".into(),
    };
    let body = cp_body(&bad, &app_id, "Checkout");
    let (status, v) = send_json(
        &h,
        post_json("/create-collection-point").body(json_body(&body)).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(v["error"]["message"], "Invalid org_key or org_secret");

    assert!(stored_collection_points(&h).await.is_empty());
    assert_eq!(manifest(&h, &creds.org_id).await, before);
}

#[tokio::test]
async fn test_missing_credential_headers_are_unauthorized() {
    let h = harness();
    let (status, _) = send(
        &h,
        Request::builder()
            .uri("/get-collection-points/some-app")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_collection_points_lists_application_points() {
    let h = harness();
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;

    let request = |app: &str| {
        with_creds(Request::builder().uri(format!("/get-collection-points/{app}")), &creds)
            .body(Body::empty())
            .unwrap()
    };
    let (status, v) = send_json(&h, request(&app_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(v["error"]["message"], "No collection points found");

    create_collection_point(&h, &creds, &app_id, "First").await;
    create_collection_point(&h, &creds, &app_id, "Second").await;
    let (status, v) = send_json(&h, request(&app_id)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = v["collection_points"]
        .as_array()
        .unwrap()
        .iter()
        .map(|cp| cp["cp_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["First", "Second"]);
}

#[tokio::test]
async fn test_delete_removes_from_store_and_manifest() {
    let h = harness();
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;
    let keep = create_collection_point(&h, &creds, &app_id, "Keep").await;
    let gone = create_collection_point(&h, &creds, &app_id, "Gone").await;
    let gone_id = gone["collection_point_data"]["cp_id"].as_str().unwrap().to_string();

    let delete = |id: &str| {
        with_creds(
            Request::builder()
                .method("DELETE")
                .uri(format!("/delete-collection-point/{id}")),
            &creds,
        )
        .body(Body::empty())
        .unwrap()
    };

    let (status, v) = send_json(&h, delete(&gone_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["message"], "Collection point deleted successfully");

    let stored = stored_collection_points(&h).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].cp_name, "Keep");
    let doc = manifest(&h, &creds.org_id).await;
    let ids: Vec<&str> = doc.applications[0]
        .collection_points
        .iter()
        .map(|cp| cp.cp_id.as_str())
        .collect();
    assert_eq!(ids, [keep["collection_point_data"]["cp_id"].as_str().unwrap()]);

    let (status, _) = send_json(&h, delete(&gone_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, v) = send_json(&h, delete("not-an-id")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_delete_is_scoped_to_caller_organisation() {
    let h = harness();
    let owner = register(&h).await;
    let other = register(&h).await;
    let app_id = create_application(&h, &owner).await;
    let cp = create_collection_point(&h, &owner, &app_id, "Mine").await;
    let cp_id = cp["collection_point_data"]["cp_id"].as_str().unwrap();

    let request = with_creds(
        Request::builder()
            .method("DELETE")
            .uri(format!("/delete-collection-point/{cp_id}")),
        &other,
    )
    .body(Body::empty())
    .unwrap();
    let (status, _) = send_json(&h, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(stored_collection_points(&h).await.len(), 1);
}

#[tokio::test]
async fn test_delete_matches_manifest_entries_verbatim() {
    let h = harness();
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;
    let cp = create_collection_point(&h, &creds, &app_id, "Checkout").await;
    let cp_id = cp["collection_point_data"]["cp_id"].as_str().unwrap().to_string();
    let upper = cp_id.to_ascii_uppercase();
    assert_ne!(upper, cp_id);

    let request = with_creds(
        Request::builder()
            .method("DELETE")
            .uri(format!("/delete-collection-point/{upper}")),
        &creds,
    )
    .body(Body::empty())
    .unwrap();
    let (status, v) = send_json(&h, request).await;
    assert_eq!(status, StatusCode::OK, "{v}");
    assert!(stored_collection_points(&h).await.is_empty());

    let doc = manifest(&h, &creds.org_id).await;
    let ids: Vec<&str> = doc.applications[0]
        .collection_points
        .iter()
        .map(|cp| cp.cp_id.as_str())
        .collect();
    assert_eq!(ids, [cp_id.as_str()]);
}

// -- Manifests ----------------------------------------------------------------

#[tokio::test]
async fn test_push_unchanged_manifest_leaves_state_untouched() {
    let h = harness();
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;
    create_collection_point(&h, &creds, &app_id, "Checkout").await;
    create_collection_point(&h, &creds, &app_id, "Signup").await;

    let path = h.state.manifests.path_for(&creds.org_id).unwrap();
    let bytes_before = std::fs::read(&path).unwrap();
    let docs_before = h
        .state
        .store()
        .find(Collection::CollectionPoints, &Filter::new())
        .await
        .unwrap();

    let yaml = String::from_utf8(bytes_before.clone()).unwrap();
    let (status, v) = send_json(&h, push_yaml_request(&creds, &app_id, &yaml)).await;
    assert_eq!(status, StatusCode::OK, "{v}");

    let docs_after = h
        .state
        .store()
        .find(Collection::CollectionPoints, &Filter::new())
        .await
        .unwrap();
    assert_eq!(docs_before, docs_after);
    assert_eq!(std::fs::read(&path).unwrap(), bytes_before);
}

#[tokio::test]
async fn test_push_yaml_is_idempotent() {
    let h = harness();
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;
    create_collection_point(&h, &creds, &app_id, "Checkout").await;

    let mut doc = manifest(&h, &creds.org_id).await;
    doc.applications[0].collection_points[0].cp_name = "Checkout v2".into();
    doc.applications[0].collection_points[0].cp_status = "inactive".into();
    let yaml = doc.to_yaml().unwrap();

    for _ in 0..2 {
        let (status, v) = send_json(&h, push_yaml_request(&creds, &app_id, &yaml)).await;
        assert_eq!(status, StatusCode::OK, "{v}");
        assert_eq!(v["message"], "YAML file updated successfully");
        assert_eq!(v["yaml_data"]["organisation_id"], creds.org_id);
    }

    let stored = stored_collection_points(&h).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].cp_name, "Checkout v2");
    assert_eq!(stored[0].cp_status, "inactive");
}

#[tokio::test]
async fn test_push_yaml_rejects_unknown_collection_point_before_writing() {
    let h = harness();
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;
    create_collection_point(&h, &creds, &app_id, "Checkout").await;

    let mut doc = manifest(&h, &creds.org_id).await;
    doc.applications[0].collection_points[0].cp_name = "Renamed".into();
    let mut ghost = doc.applications[0].collection_points[0].clone();
    ghost.cp_id = "0123456789abcdef01234567".into();
    doc.applications[0].collection_points.push(ghost);

    let (status, v) = send_json(&h, push_yaml_request(&creds, &app_id, &doc.to_yaml().unwrap())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        v["error"]["message"],
        "Collection point 0123456789abcdef01234567 not found. Please create it first."
    );
    assert_eq!(stored_collection_points(&h).await[0].cp_name, "Checkout");
}

#[tokio::test]
async fn test_push_yaml_validates_document() {
    let h = harness();
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;

    let (status, _) = send_json(&h, push_yaml_request(&creds, &app_id, "applications: [oops")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let foreign = ManifestDocument::new("someone-else", vec![]).to_yaml().unwrap();
    let (status, _) = send_json(&h, push_yaml_request(&creds, &app_id, &foreign)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut doc = manifest(&h, &creds.org_id).await;
    doc.append_collection_point(
        &app_id,
        ManifestCollectionPoint {
            cp_id: "xyz".into(),
            cp_name: "Bad".into(),
            cp_status: "active".into(),
            cp_url: String::new(),
            data_elements: vec![],
        },
    );
    let (status, _) = send_json(&h, push_yaml_request(&creds, &app_id, &doc.to_yaml().unwrap())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_template_is_yaml() {
    let h = harness();
    let creds = register(&h).await;
    let response = h
        .app
        .clone()
        .oneshot(
            with_creds(Request::builder().uri("/collection-point-template"), &creds)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/x-yaml");
    let doc = ManifestDocument::from_yaml(&body_string(response).await).unwrap();
    assert_eq!(doc.organisation_id, creds.org_id);
    assert!(!doc.applications[0].collection_points.is_empty());
}

#[tokio::test]
async fn test_rebuild_restores_manifest_from_store() {
    let h = harness();
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;
    create_collection_point(&h, &creds, &app_id, "Checkout").await;

    let mut stale = manifest(&h, &creds.org_id).await;
    stale.applications[0].collection_points.clear();
    h.state.manifests.write(&creds.org_id, &stale).await.unwrap();

    let request = with_creds(Request::builder().method("POST").uri("/rebuild-manifest"), &creds)
        .body(Body::empty())
        .unwrap();
    let (status, v) = send_json(&h, request).await;
    assert_eq!(status, StatusCode::OK, "{v}");

    let doc = manifest(&h, &creds.org_id).await;
    let stored = stored_collection_points(&h).await;
    assert_eq!(
        doc.applications[0].collection_points,
        vec![ManifestCollectionPoint::from(&stored[0])]
    );
}

// -- Notices ------------------------------------------------------------------

#[tokio::test]
async fn test_notice_info_embeds_collection_point() {
    let h = harness();
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;
    let cp = create_collection_point(&h, &creds, &app_id, "Checkout").await;
    let cp_id = cp["collection_point_data"]["cp_id"].as_str().unwrap();

    let request = |app: &str| {
        with_creds(Request::builder().uri(format!("/get-notice-info/{cp_id}")), &creds)
            .header("app-id", app)
            .body(Body::empty())
            .unwrap()
    };

    let (status, v) = send_json(&h, request(&app_id)).await;
    assert_eq!(status, StatusCode::OK, "{v}");
    let info = &v["notice_info"];
    assert!(info["urls"].is_object());
    assert_eq!(info["english"]["collection_point"]["cp_id"], cp_id);
    assert_eq!(info["hindi"]["collection_point"]["cp_name"], "Checkout");
    assert!(info["tamil"]["button"]["selectAll"].is_string());

    let (status, v) = send_json(&h, request("another-app")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        v["error"]["message"],
        format!("Collection point with ID {cp_id} not found")
    );
}

// -- Consent Preferences ------------------------------------------------------

fn consent_body(creds: &Creds, cp_id: &str, element: &str) -> Value {
    json!({
        "org_id": creds.org_id,
        "org_key": creds.org_key,
        "org_secret": creds.org_secret,
        "cp_id": cp_id,
        "dp_id": "principal-1",
        "dp_email_hash": "5d41402abc4b2a76b9719d911017c592",
        "consent_scope": [{
            "data_element_name": element,
            "purpose_id": "p-1",
            "consent_status": true,
            "shared": false,
            "data_processor_id": ["proc-1"],
            "cross_border": false
        }]
    })
}

#[tokio::test]
async fn test_consent_created_then_updated() {
    let h = harness();
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;
    let cp = create_collection_point(&h, &creds, &app_id, "Checkout").await;
    let cp_id = cp["collection_point_data"]["cp_id"].as_str().unwrap();

    let body = consent_body(&creds, cp_id, "email");
    let post = || post_json("/post-consent-preference").body(json_body(&body)).unwrap();

    let (status, first) = send_json(&h, post()).await;
    assert_eq!(status, StatusCode::OK, "{first}");
    assert_eq!(first["message"], "Consent preferences created successfully");

    let (status, second) = send_json(&h, post()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["message"], "Consent preferences updated successfully");
    assert_eq!(first["agreement_id"], second["agreement_id"]);

    let count = h
        .state
        .store()
        .count(Collection::ConsentPreferences, &Filter::new())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_consent_rejects_undeclared_data_element() {
    let h = harness();
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;
    let cp = create_collection_point(&h, &creds, &app_id, "Checkout").await;
    let cp_id = cp["collection_point_data"]["cp_id"].as_str().unwrap();

    let body = consent_body(&creds, cp_id, "passport");
    let (status, v) = send_json(
        &h,
        post_json("/post-consent-preference").body(json_body(&body)).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(v["error"]["message"].as_str().unwrap().contains("passport"));
}

#[tokio::test]
async fn test_consent_scope_unchecked_when_validation_disabled() {
    let h = harness_with(|c| c.consent_scope_validation = false);
    let creds = register(&h).await;
    let app_id = create_application(&h, &creds).await;
    let cp = create_collection_point(&h, &creds, &app_id, "Checkout").await;
    let cp_id = cp["collection_point_data"]["cp_id"].as_str().unwrap();

    let body = consent_body(&creds, cp_id, "passport");
    let (status, v) = send_json(
        &h,
        post_json("/post-consent-preference").body(json_body(&body)).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{v}");
    assert_eq!(v["message"], "Consent preferences created successfully");

    let count = h
        .state
        .store()
        .count(Collection::ConsentPreferences, &Filter::new())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_consent_for_missing_collection_point_is_not_found() {
    let h = harness();
    let creds = register(&h).await;
    let body = consent_body(&creds, "0123456789abcdef01234567", "email");
    let (status, v) = send_json(
        &h,
        post_json("/post-consent-preference").body(json_body(&body)).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(v["error"]["message"], "Collection point not found");
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_spec_served() {
    let h = harness();
    let (status, v) = send_json(&h, Request::builder().uri("/openapi.json").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(v["paths"]["/push-yaml"].is_object());
    assert!(v["components"]["schemas"]["ErrorBody"].is_object());
}

// -- Rate Limiting ------------------------------------------------------------

#[tokio::test]
async fn test_rate_limit_applies_per_client() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig {
        manifest_dir: dir.path().to_path_buf(),
        rate_limit_per_minute: 2,
        ..Default::default()
    };
    let state = AppState::new(Arc::new(MemoryStore::new()), config);
    let app = concur_api::app(state);

    let get_root = |ip: &str| {
        Request::builder()
            .uri("/")
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .unwrap()
    };
    for _ in 0..2 {
        let response = app.clone().oneshot(get_root("10.0.0.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app.clone().oneshot(get_root("10.0.0.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let response = app.clone().oneshot(get_root("10.0.0.2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/health/liveness").header("x-forwarded-for", "10.0.0.1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
