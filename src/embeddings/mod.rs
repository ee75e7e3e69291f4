// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding model stack: ONNX inference, model loading, and the
//! hot-swappable model registry.

pub mod hash_model;
pub mod loader;
pub mod onnx_model;
pub mod registry;

pub use hash_model::{HashEmbeddingModel, HashModelLoader};
pub use loader::OnnxModelLoader;
pub use onnx_model::OnnxEmbeddingModel;
pub use registry::{ModelRegistry, RegistryError, DEFAULT_BATCH_SIZE, MAX_HISTORY};

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A loaded sentence-embedding model.
///
/// Given a list of strings and a chunk size, produces one fixed-length
/// L2-normalized vector per string, order-preserving. Chunking is a
/// throughput concern only; output values must not depend on it.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Embeds `texts`, running inference in chunks of `batch_size` inputs.
    async fn embed_batch(&self, texts: &[String], batch_size: usize) -> Result<Vec<Vec<f32>>>;

    /// Model name this instance was loaded from
    fn name(&self) -> &str;

    /// Output vector dimension
    fn dimension(&self) -> usize;
}

/// Constructs [`EmbeddingModel`] instances from model names.
///
/// The registry calls this on every switch and reload; a loader failure
/// must leave no side effects.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, name: &str) -> Result<Arc<dyn EmbeddingModel>>;
}

/// Vectors plus the wall-clock time the locked inference section took.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub vectors: Vec<Vec<f32>>,
    pub time_ms: f64,
}
