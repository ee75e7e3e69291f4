// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Bearer-token auth middleware.
//!
//! Protected routes are wrapped with [`require_bearer`]; a request with a
//! wrong or absent credential gets the fixed 401 body before any handler
//! logic runs.

use crate::api::errors::ApiError;
use crate::api::server::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Middleware checking `Authorization: Bearer <token>` against the
/// configured static secret.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if token_matches(request.headers(), &state.api_token) {
        next.run(request).await
    } else {
        ApiError::Unauthorized.into_response()
    }
}

/// True when the headers carry a bearer token equal to `expected`.
fn token_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token == expected)
        .unwrap_or(false)
}
