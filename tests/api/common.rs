// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared helpers for API tests: a router backed by the deterministic
//! hash model loader, plus request/response plumbing.

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use embed_node::{build_router, AppState, HashModelLoader, ModelRegistry};
use http_body_util::BodyExt;
use std::sync::Arc;

pub const TEST_TOKEN: &str = "test-token";
pub const DIMENSION: usize = 32;

pub struct TestServer {
    pub router: Router,
    pub state: AppState,
    pub loader: Arc<HashModelLoader>,
}

/// Server with models "model-a" (active), "model-b", "model-c"
pub async fn setup() -> TestServer {
    setup_with_models(&["model-a", "model-b", "model-c"]).await
}

pub async fn setup_with_models(models: &[&str]) -> TestServer {
    let loader = Arc::new(HashModelLoader::new(DIMENSION).with_known_models(models));
    let registry = Arc::new(
        ModelRegistry::new(loader.clone(), models[0])
            .await
            .expect("registry init"),
    );
    let state = AppState::new(registry, TEST_TOKEN).expect("app state");
    let router = build_router(state.clone());

    TestServer {
        router,
        state,
        loader,
    }
}

/// Builds a request; `token: None` omits the Authorization header.
pub fn request(
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn authed_post(path: &str, body: serde_json::Value) -> Request<Body> {
    request(Method::POST, path, Some(TEST_TOKEN), Some(body))
}

pub fn authed_get(path: &str) -> Request<Body> {
    request(Method::GET, path, Some(TEST_TOKEN), None)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body is UTF-8")
}
