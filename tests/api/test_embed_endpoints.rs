// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tests for POST /embed and POST /embed_batch.

use super::common::{authed_post, body_json, setup, DIMENSION};
use axum::http::StatusCode;
use embed_node::{EmbeddingModel, HashEmbeddingModel};
use tower::ServiceExt;

/// Vectors the active test model ("model-a") must produce for `texts`
async fn reference_vectors(texts: &[&str]) -> Vec<Vec<f32>> {
    let model = HashEmbeddingModel::new("model-a", DIMENSION);
    let texts: Vec<String> = texts.iter().map(|s| s.to_string()).collect();
    model.embed_batch(&texts, 32).await.unwrap()
}

fn as_vectors(value: &serde_json::Value) -> Vec<Vec<f32>> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|row| {
            row.as_array()
                .unwrap()
                .iter()
                .map(|x| x.as_f64().unwrap() as f32)
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn test_embed_one_vector_per_text_in_order() {
    let server = setup().await;

    let response = server
        .router
        .clone()
        .oneshot(authed_post(
            "/embed",
            serde_json::json!({ "texts": ["first", "second", "third"] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let vectors = as_vectors(&body["embeddings"]);
    assert_eq!(vectors, reference_vectors(&["first", "second", "third"]).await);
    assert!(body["time_ms"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_embed_empty_texts() {
    let server = setup().await;

    let response = server
        .router
        .clone()
        .oneshot(authed_post("/embed", serde_json::json!({ "texts": [] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["embeddings"], serde_json::json!([]));
    assert!(body["time_ms"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_embed_batch_matches_embed_for_any_batch_size() {
    let server = setup().await;
    let texts: Vec<String> = (0..7).map(|i| format!("text {}", i)).collect();

    let direct = body_json(
        server
            .router
            .clone()
            .oneshot(authed_post("/embed", serde_json::json!({ "texts": texts })))
            .await
            .unwrap(),
    )
    .await;

    // Includes sizes that do not divide 7 evenly
    for batch_size in [1, 2, 3, 5, 7, 32] {
        let chunked = body_json(
            server
                .router
                .clone()
                .oneshot(authed_post(
                    "/embed_batch",
                    serde_json::json!({ "texts": texts, "batch_size": batch_size }),
                ))
                .await
                .unwrap(),
        )
        .await;

        assert_eq!(
            chunked["embeddings"], direct["embeddings"],
            "batch_size={}",
            batch_size
        );
    }
}

#[tokio::test]
async fn test_embed_batch_defaults_batch_size() {
    let server = setup().await;

    let response = server
        .router
        .clone()
        .oneshot(authed_post(
            "/embed_batch",
            serde_json::json!({ "texts": ["no batch size given"] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(as_vectors(&body["embeddings"]).len(), 1);
}

#[tokio::test]
async fn test_embed_batch_zero_batch_size_falls_back() {
    let server = setup().await;

    let response = server
        .router
        .clone()
        .oneshot(authed_post(
            "/embed_batch",
            serde_json::json!({ "texts": ["a", "b"], "batch_size": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        as_vectors(&body["embeddings"]),
        reference_vectors(&["a", "b"]).await
    );
}

#[tokio::test]
async fn test_embed_rejects_malformed_body() {
    let server = setup().await;

    let response = server
        .router
        .clone()
        .oneshot(authed_post("/embed", serde_json::json!({ "wrong": true })))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_vector_dimension_is_stable() {
    let server = setup().await;

    let response = server
        .router
        .clone()
        .oneshot(authed_post(
            "/embed",
            serde_json::json!({ "texts": ["short", "a considerably longer input text"] }),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    let vectors = as_vectors(&body["embeddings"]);
    assert!(vectors.iter().all(|v| v.len() == DIMENSION));
}
