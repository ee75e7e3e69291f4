// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model management, health, shutdown, metrics, and version handlers.
//!
//! Switch/reload/health report model failures as 200-status payloads with
//! `status: "error"` so clients branch on the payload field, never on the
//! HTTP code.

use crate::api::server::AppState;
use crate::monitoring::metrics::METRICS_CONTENT_TYPE;
use crate::version;
use axum::extract::{Json, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{error, info};

/// Request body for POST /switch_model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchModelRequest {
    pub model: String,
}

/// POST /switch_model handler
///
/// Loads the named model and installs it as active. A failed load leaves
/// the current model and history untouched.
pub async fn switch_model_handler(
    State(state): State<AppState>,
    Json(request): Json<SwitchModelRequest>,
) -> Json<serde_json::Value> {
    match state.registry.switch(&request.model).await {
        Ok(model) => Json(json!({ "status": "success", "model": model })),
        Err(e) => Json(json!({ "status": "error", "error": e.to_string() })),
    }
}

/// POST /reload_model_from_disk handler
///
/// Reconstructs the active model from its current name so on-disk changes
/// take effect. History is unchanged.
pub async fn reload_model_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.registry.reload_current().await {
        Ok(model) => Json(json!({ "status": "reloaded", "model": model })),
        Err(e) => Json(json!({ "status": "error", "error": e.to_string() })),
    }
}

/// GET /healthz handler
///
/// Runs a probe embedding through the same locked path as real traffic, so
/// "up but model broken" is distinguishable from "down". Failures are
/// reported in the payload, not as a transport error.
pub async fn healthz_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.registry.probe().await {
        Ok(model) => Json(json!({ "status": "ok", "model": model })),
        Err(e) => Json(json!({ "status": "error", "error": e.to_string() })),
    }
}

/// POST /shutdown handler
///
/// Responds, then signals the server loop to stop. Not graceful: in-flight
/// requests on other connections may be cut off.
pub async fn shutdown_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    info!("Shutdown requested via API");

    let shutdown = state.shutdown.clone();
    tokio::spawn(async move {
        // Give the triggering response time to flush
        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = shutdown.send(true);
    });

    Json(json!({ "status": "shutting down" }))
}

/// GET /metrics handler, unauthenticated Prometheus text exposition
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.export() {
        Ok(body) => ([(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!("Metrics export failed: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET /version handler
pub async fn version_handler() -> Json<serde_json::Value> {
    Json(version::get_version_info())
}
