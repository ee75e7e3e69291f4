// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Handlers for POST /embed and POST /embed_batch.

use crate::api::embed::{BatchEmbedRequest, EmbedRequest, EmbedResponse};
use crate::api::errors::ApiError;
use crate::api::server::AppState;
use axum::extract::{Json, State};
use tracing::error;

/// POST /embed handler
///
/// Embeds every input text with the active model at the default chunk
/// size. Embedding is assumed not to fail for well-formed string lists;
/// if it does, the failure surfaces as a 500.
pub async fn embed_handler(
    State(state): State<AppState>,
    Json(request): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let output = state.registry.embed(&request.texts).await.map_err(|e| {
        error!("Embedding failed: {:#}", e);
        ApiError::InternalError(format!("embedding failed: {}", e))
    })?;

    Ok(Json(EmbedResponse::from(output)))
}

/// POST /embed_batch handler
///
/// Same semantics as /embed with a caller-chosen chunk size. A missing or
/// zero batch_size falls back to the default of 32; output values are
/// identical to /embed either way.
pub async fn embed_batch_handler(
    State(state): State<AppState>,
    Json(request): Json<BatchEmbedRequest>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let batch_size = request.effective_batch_size();

    let output = state
        .registry
        .embed_batch(&request.texts, batch_size)
        .await
        .map_err(|e| {
            error!("Batch embedding failed: {:#}", e);
            ApiError::InternalError(format!("embedding failed: {}", e))
        })?;

    Ok(Json(EmbedResponse::from(output)))
}
