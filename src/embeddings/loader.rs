// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Resolves model names to loadable ONNX files.
//!
//! A name like `thenlper/gte-base` is first looked up under the local
//! models directory (`<models_dir>/thenlper--gte-base/`); if the files are
//! not there, the Hugging Face Hub is queried for an ONNX export. Reloading
//! a model therefore re-reads whatever is on disk for that name.

use crate::embeddings::{EmbeddingModel, ModelLoader, OnnxEmbeddingModel};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Loader backed by a local models directory with a Hugging Face Hub
/// fallback
#[derive(Debug, Clone)]
pub struct OnnxModelLoader {
    models_dir: PathBuf,
}

impl OnnxModelLoader {
    pub fn new(models_dir: PathBuf) -> Self {
        Self { models_dir }
    }

    /// Directory a model name maps to, with `/` flattened to `--`
    fn local_dir(&self, name: &str) -> PathBuf {
        self.models_dir.join(name.replace('/', "--"))
    }
}

#[async_trait]
impl ModelLoader for OnnxModelLoader {
    async fn load(&self, name: &str) -> Result<Arc<dyn EmbeddingModel>> {
        let name = name.to_string();
        let local_dir = self.local_dir(&name);

        // Session construction and any hub download are blocking
        let model = tokio::task::spawn_blocking(move || -> Result<OnnxEmbeddingModel> {
            let (model_path, tokenizer_path) = resolve_files(&local_dir, &name)?;
            OnnxEmbeddingModel::load(name, model_path, tokenizer_path)
        })
        .await
        .context("Model load task panicked")??;

        Ok(Arc::new(model))
    }
}

fn resolve_files(local_dir: &Path, name: &str) -> Result<(PathBuf, PathBuf)> {
    let model_path = local_dir.join("model.onnx");
    let tokenizer_path = local_dir.join("tokenizer.json");

    if model_path.exists() && tokenizer_path.exists() {
        info!("Resolved model {} from {}", name, local_dir.display());
        return Ok((model_path, tokenizer_path));
    }

    info!("Model {} not found locally, querying Hugging Face Hub", name);

    let api = hf_hub::api::sync::Api::new().context("Failed to initialize Hugging Face Hub API")?;
    let repo = api.model(name.to_string());

    let model_path = repo
        .get("onnx/model.onnx")
        .or_else(|_| repo.get("model.onnx"))
        .context(format!("No ONNX export found on the Hub for '{}'", name))?;
    let tokenizer_path = repo
        .get("tokenizer.json")
        .context(format!("No tokenizer.json found on the Hub for '{}'", name))?;

    Ok((model_path, tokenizer_path))
}
