//! Authentication integration tests.
//!
//! Tests verify:
//! - Missing/malformed Authorization headers are rejected
//! - Invalid, expired and wrong-issuer tokens are rejected
//! - Valid RS256 tokens are accepted
//! - Public routes stay public when auth is enabled
//! - Auth disabled (the default) leaves the compile routes open

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use ts_bundler::engine::CompilerService;
use ts_bundler::server::{create_router, RouterConfig};

use super::test_utils::{
    expired_token, make_token, multipart_body, multipart_content_type, test_router,
    test_router_with_auth, token_without_exp, token_without_issuer, valid_token, MockEngine,
    TEST_ISSUER,
};

fn compile_request(token: Option<&str>) -> Request<Body> {
    let body = serde_json::json!({ "code": "const x: number = 1;" }).to_string();
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/compile")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

async fn error_message(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    json["error"].as_str().unwrap().to_string()
}

// =============================================================================
// Missing / Malformed Headers
// =============================================================================

#[tokio::test]
async fn test_missing_header_rejected() {
    let router = test_router_with_auth(TEST_ISSUER);

    let response = router.oneshot(compile_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = error_message(response).await;
    assert!(error.contains("Bearer token required"), "{}", error);
}

#[tokio::test]
async fn test_missing_header_rejected_on_file_route() {
    let router = test_router_with_auth(TEST_ISSUER);

    // Payload is perfectly valid; the gate must reject before validation
    let request = Request::builder()
        .method(Method::POST)
        .uri("/compile-file")
        .header(header::CONTENT_TYPE, multipart_content_type())
        .body(multipart_body("file", Some("foo.ts"), "const x = 1;"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = error_message(response).await;
    assert!(error.contains("Bearer token required"));
}

#[tokio::test]
async fn test_non_bearer_scheme_rejected() {
    let router = test_router_with_auth(TEST_ISSUER);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/compile")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::from(r#"{"code": "const x = 1;"}"#))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = error_message(response).await;
    assert!(error.contains("Bearer token required"));
}

// =============================================================================
// Token Verification
// =============================================================================

#[tokio::test]
async fn test_garbage_token_rejected() {
    let router = test_router_with_auth(TEST_ISSUER);

    let response = router
        .oneshot(compile_request(Some("not.a.jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let router = test_router_with_auth(TEST_ISSUER);

    let token = expired_token();
    let response = router.oneshot(compile_request(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_issuer_rejected() {
    let router = test_router_with_auth(TEST_ISSUER);

    let token = make_token("https://somebody-else.test", 3600);
    let response = router.oneshot(compile_request(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_public_key_rejected() {
    let compiler = CompilerService::new(MockEngine::new());
    let router = create_router(
        compiler,
        RouterConfig::new(TEST_ISSUER, "not a pem").with_tracing(false),
    );

    let token = valid_token();
    let response = router.oneshot(compile_request(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = error_message(response).await;
    assert!(error.contains("Invalid public key"), "{}", error);
}

#[tokio::test]
async fn test_token_without_exp_accepted() {
    let router = test_router_with_auth(TEST_ISSUER);

    // Expiry is enforced only when the token carries an exp claim
    let token = token_without_exp();
    let response = router.oneshot(compile_request(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_token_without_issuer_rejected() {
    let router = test_router_with_auth(TEST_ISSUER);

    let token = token_without_issuer();
    let response = router.oneshot(compile_request(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_accepted() {
    let router = test_router_with_auth(TEST_ISSUER);

    let token = valid_token();
    let response = router.oneshot(compile_request(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["success"], true);
}

// =============================================================================
// Gate Scope
// =============================================================================

#[tokio::test]
async fn test_public_routes_stay_public() {
    let router = test_router_with_auth(TEST_ISSUER);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/openapi.json")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_auth_disabled_allows_anonymous_compile() {
    // The default deployment mode: no gate mounted at all
    let router = test_router();

    let response = router.oneshot(compile_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
