//! HTTP behaviour of the `/api/v1/jobs` routes that is decided before any
//! database access: auth, query parsing, id parsing and geocoding.
//!
//! The router runs against a lazy pool pointed at a closed port, so these
//! tests need no PostgreSQL.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, get, post_json, send, token_for, unreachable_pool};
use serde_json::json;

fn job_body() -> serde_json::Value {
    json!({
        "title": "Backend Engineer",
        "description": "Rust services",
        "jobType": "Full-time",
        "company": 1,
        "location": "90210"
    })
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unsupported_operator_is_rejected() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/api/v1/jobs?salary.min%5Bbetween%5D=1").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("between"));
}

#[tokio::test]
async fn dollar_prefixed_keys_are_rejected() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/api/v1/jobs?%24where=1").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_filter_field_passes_validation() {
    // Accepted as an always-false filter, so the request reaches the
    // (unreachable) database instead of failing with 400.
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/api/v1/jobs?location=Boston&page=1&limit=10").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Server Error");
}

#[tokio::test]
async fn uncastable_filter_value_is_rejected() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/api/v1/jobs?salary.min%5Bgte%5D=lots").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Single job
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_numeric_id_is_not_found_with_literal_id() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/api/v1/jobs/5d713995b721c3bb38c1f5d0").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Job not found with id of 5d713995b721c3bb38c1f5d0"
    );
}

// ---------------------------------------------------------------------------
// Radius
// ---------------------------------------------------------------------------

#[tokio::test]
async fn radius_with_bad_distance_is_rejected() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/api/v1/jobs/radius/90210/far").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn radius_with_bad_unit_is_rejected() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/api/v1/jobs/radius/90210/10?unit=furlongs").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn radius_for_unknown_zipcode_is_not_found() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/api/v1/jobs/radius/00000/10").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No location found for '00000'");
}

#[tokio::test]
async fn radius_geocoder_outage_is_bad_gateway() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/api/v1/jobs/radius/fail/10").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_without_token_is_unauthorized() {
    let app = build_test_app(unreachable_pool());
    let response = post_json(app, "/api/v1/jobs", None, job_body()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Not authorized to access this route");
}

#[tokio::test]
async fn create_with_garbage_token_is_unauthorized() {
    let app = build_test_app(unreachable_pool());
    let response = post_json(app, "/api/v1/jobs", Some("not-a-jwt"), job_body()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_as_plain_user_is_forbidden() {
    let app = build_test_app(unreachable_pool());
    let token = token_for(9, "user");
    let response = post_json(app, "/api/v1/jobs", Some(&token), job_body()).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "User role user is not authorized to access this route"
    );
}

#[tokio::test]
async fn create_with_invalid_job_type_fails_validation() {
    let app = build_test_app(unreachable_pool());
    let token = token_for(9, "employer");
    let mut body = job_body();
    body["jobType"] = json!("Gig");
    let response = post_json(app, "/api/v1/jobs", Some(&token), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn create_with_malformed_json_is_bad_request() {
    let app = build_test_app(unreachable_pool());
    let token = token_for(9, "employer");
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/jobs")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from("{\"title\": "))
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Middleware and health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/api/v1/jobs/abc").await;

    let headers = response.headers();
    let request_id = headers.get("x-request-id").expect("x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = build_test_app(unreachable_pool());
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/jobs")
        .header("Origin", common::TEST_ORIGIN)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "authorization,content-type")
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        common::TEST_ORIGIN
    );
}

#[tokio::test]
async fn health_reports_unavailable_database() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["database"], "down");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
