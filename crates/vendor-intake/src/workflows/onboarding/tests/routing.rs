use super::common::*;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::onboarding::memory::InMemoryStore;
use crate::workflows::onboarding::router::{list_mine_handler, submit_handler, USER_HEADER};
use crate::workflows::onboarding::service::UNAVAILABLE_MESSAGE;
use crate::workflows::onboarding::VendorOnboardingService;

fn submit_payload() -> serde_json::Value {
    json!({
        "name": "Acme Corp",
        "vatNumber": "IT01234567890",
        "categories": "Concrete, Aggregates, ",
        "headquarters": { "city": "Milan", "country": "" },
        "justification": "We urgently need Acme for the downtown project build",
    })
}

#[tokio::test]
async fn submit_route_creates_pending_requests() {
    let fixture = fixture();

    let response = fixture
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/vendor-requests",
            Some(&fixture.buyer.id),
            Some(submit_payload()),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["requestedBy"], fixture.buyer.id.0);
    assert_eq!(body["categories"], json!(["Concrete", "Aggregates"]));
    assert_eq!(body["headquarters"], json!({ "city": "Milan" }));
    assert!(body["linkedVendorId"].is_null());
}

#[tokio::test]
async fn submit_route_reports_field_errors() {
    let fixture = fixture();

    let response = fixture
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/vendor-requests",
            Some(&fixture.buyer.id),
            Some(json!({
                "name": "Ac",
                "justification": "short",
                "primaryContact": { "email": "ops@acme.example" },
            })),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["fields"]["name"], "too_short");
    assert_eq!(body["fields"]["justification"], "too_short");
    assert_eq!(body["fields"]["primaryContact.name"], "required");
}

#[tokio::test]
async fn missing_principal_header_is_unauthorized() {
    let fixture = fixture();
    let service = Arc::new(fixture.service.clone());

    let response = submit_handler::<InMemoryStore, InMemoryStore, InMemoryStore>(
        State(service),
        HeaderMap::new(),
        axum::Json(valid_draft()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], UNAVAILABLE_MESSAGE);
}

#[tokio::test]
async fn persistence_outage_maps_to_service_unavailable() {
    let fixture = fixture();
    let service = Arc::new(VendorOnboardingService::new(
        Arc::new(UnavailableStore),
        Arc::new(fixture.store.clone()),
        Arc::new(fixture.store.clone()),
    ));
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_HEADER,
        HeaderValue::from_str(&fixture.buyer.id.0).expect("header value"),
    );

    let response = list_mine_handler::<UnavailableStore, InMemoryStore, InMemoryStore>(
        State(service),
        headers,
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], UNAVAILABLE_MESSAGE);
}

#[tokio::test]
async fn decision_route_approves_and_lists_catalog() {
    let fixture = fixture();
    let request = fixture.submit_valid();
    let router = fixture.router();

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/vendor-requests/{}/decision", request.id),
            Some(&fixture.admin.id),
            Some(json!({ "decision": "approved", "decisionNotes": "Looks good" })),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "approved");
    assert_eq!(body["decisionNotes"], "Looks good");
    assert_eq!(body["reviewedBy"], fixture.admin.id.0);
    let vendor_id = body["linkedVendorId"].as_str().expect("vendor linked").to_string();

    let response = router
        .oneshot(json_request(
            Method::GET,
            "/api/v1/vendors",
            Some(&fixture.buyer.id),
            None,
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body[0]["id"], vendor_id);
    assert_eq!(body[0]["requestCounts"], json!({ "total": 1, "pending": 0, "approved": 1 }));
}

#[tokio::test]
async fn decision_route_maps_role_and_conflict_failures() {
    let fixture = fixture();
    let request = fixture.submit_valid();
    let router = fixture.router();
    let uri = format!("/api/v1/vendor-requests/{}/decision", request.id);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &uri,
            Some(&fixture.manager.id),
            Some(json!({ "decision": "approved" })),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &uri,
            Some(&fixture.admin.id),
            Some(json!({ "decision": "rejected" })),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(json_request(
            Method::POST,
            &uri,
            Some(&fixture.admin.id),
            Some(json!({ "decision": "approved" })),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("rejected"));
}

#[tokio::test]
async fn unknown_request_is_not_found() {
    let fixture = fixture();

    let response = fixture
        .router()
        .oneshot(json_request(
            Method::GET,
            "/api/v1/vendor-requests/req-missing",
            Some(&fixture.admin.id),
            None,
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_route_filters_by_status() {
    let fixture = fixture();
    let request = fixture.submit_valid();
    fixture.submit_valid();
    fixture
        .service
        .start_review(&fixture.as_admin(), &request.id)
        .expect("start review");
    let router = fixture.router();

    let response = router
        .clone()
        .oneshot(json_request(
            Method::GET,
            "/api/v1/vendor-requests?status=reviewing",
            Some(&fixture.admin.id),
            None,
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], request.id.0);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::GET,
            "/api/v1/vendor-requests?status=archived",
            Some(&fixture.admin.id),
            None,
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(json_request(
            Method::GET,
            "/api/v1/vendor-requests/mine",
            Some(&fixture.buyer.id),
            None,
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn vat_lookup_returns_vendors_and_requests() {
    let fixture = fixture();
    fixture.submit_valid();

    let response = fixture
        .router()
        .oneshot(json_request(
            Method::GET,
            "/api/v1/vat-lookup?vat=IT01234567890",
            Some(&fixture.buyer.id),
            None,
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["vendors"], json!([]));
    assert_eq!(body["requests"].as_array().map(Vec::len), Some(1));
}
