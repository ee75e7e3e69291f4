// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Bearer-token gate tests: every protected endpoint rejects bad or
//! missing credentials with the fixed 401 body, before any handler logic
//! runs.

use super::common::{authed_get, body_json, request, setup, TEST_TOKEN};
use axum::http::{Method, StatusCode};
use tower::ServiceExt;

const PROTECTED_POSTS: &[&str] = &[
    "/embed",
    "/embed_batch",
    "/switch_model",
    "/reload_model_from_disk",
    "/shutdown",
];

fn body_for(path: &str) -> Option<serde_json::Value> {
    match path {
        "/embed" | "/embed_batch" => Some(serde_json::json!({ "texts": ["hello"] })),
        "/switch_model" => Some(serde_json::json!({ "model": "model-b" })),
        _ => None,
    }
}

#[tokio::test]
async fn test_missing_token_yields_401() {
    let server = setup().await;

    for path in PROTECTED_POSTS {
        let response = server
            .router
            .clone()
            .oneshot(request(Method::POST, path, None, body_for(path)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", path);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Invalid token" }));
    }

    let response = server
        .router
        .clone()
        .oneshot(request(Method::GET, "/healthz", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_token_yields_401() {
    let server = setup().await;

    for path in PROTECTED_POSTS {
        let response = server
            .router
            .clone()
            .oneshot(request(
                Method::POST,
                path,
                Some("not-the-token"),
                body_for(path),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", path);
    }
}

#[tokio::test]
async fn test_rejected_requests_never_reach_the_registry() {
    let server = setup().await;
    // One load happened at registry init
    assert_eq!(server.loader.load_calls(), 1);

    for token in [None, Some("wrong")] {
        let response = server
            .router
            .clone()
            .oneshot(request(
                Method::POST,
                "/switch_model",
                token,
                Some(serde_json::json!({ "model": "model-b" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = server
            .router
            .clone()
            .oneshot(request(Method::POST, "/reload_model_from_disk", token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // No switch or reload ever hit the loader
    assert_eq!(server.loader.load_calls(), 1);
}

#[tokio::test]
async fn test_valid_token_passes_the_gate() {
    let server = setup().await;

    let response = server
        .router
        .clone()
        .oneshot(authed_get("/healthz"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_bearer_prefix_is_required() {
    let server = setup().await;

    let req = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/healthz")
        .header("authorization", TEST_TOKEN) // raw token, no scheme
        .body(axum::body::Body::empty())
        .unwrap();

    let response = server.router.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
