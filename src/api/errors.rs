// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON body used for transport-level errors (401, 500)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors rendered as HTTP error responses.
///
/// Model-load failures are deliberately NOT here: switch/reload/health
/// report those as 200-status payloads with `status: "error"`, so callers
/// branch on the payload rather than the HTTP code.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Bad or missing bearer credential; body is a fixed message
    Unauthorized,
    /// Unexpected failure inside a handler
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let error = match self {
            ApiError::Unauthorized => "Invalid token".to_string(),
            ApiError::InternalError(msg) => msg.clone(),
        };
        ErrorResponse { error }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Unauthorized: invalid token"),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
