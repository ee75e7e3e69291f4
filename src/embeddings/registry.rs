// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Hot-swappable model registry.
//!
//! Holds the one shared mutable resource in the process: the active
//! embedding model, its name, and a bounded most-recently-used history of
//! model names. Handle, name, and history live together behind a single
//! `tokio::sync::Mutex`, so inference and model replacement are mutually
//! exclusive and no caller can observe a handle paired with the wrong
//! name. One slow embedding call stalls everything else waiting on the
//! model; callers block with no timeout.

use crate::embeddings::{EmbeddingModel, EmbeddingOutput, ModelLoader};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Upper bound on the model-name history
pub const MAX_HISTORY: usize = 5;

/// Chunk size used when the caller does not pick one
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Fixed input used by the health probe
const PROBE_TEXT: &str = "ping";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to load model '{name}': {source}")]
    ModelLoad {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

struct ActiveModel {
    model: Arc<dyn EmbeddingModel>,
    name: String,
    history: Vec<String>,
}

/// Owner of the active embedding model and its switch history
pub struct ModelRegistry {
    loader: Arc<dyn ModelLoader>,
    active: Mutex<ActiveModel>,
}

impl ModelRegistry {
    /// Loads `default_model` through `loader` and seeds the history with it.
    pub async fn new(loader: Arc<dyn ModelLoader>, default_model: &str) -> anyhow::Result<Self> {
        let model = loader.load(default_model).await?;
        info!("Registry initialized with model {}", default_model);

        Ok(Self {
            loader,
            active: Mutex::new(ActiveModel {
                model,
                name: default_model.to_string(),
                history: vec![default_model.to_string()],
            }),
        })
    }

    /// Snapshot of the active model handle and its name, taken under the
    /// lock so the pair is always consistent.
    pub async fn get_active(&self) -> (Arc<dyn EmbeddingModel>, String) {
        let active = self.active.lock().await;
        (active.model.clone(), active.name.clone())
    }

    /// Name of the currently active model
    pub async fn active_model_name(&self) -> String {
        self.active.lock().await.name.clone()
    }

    /// Most-recently-used model names, newest first
    pub async fn history(&self) -> Vec<String> {
        self.active.lock().await.history.clone()
    }

    /// Embeds `texts` with the default chunk size.
    pub async fn embed(&self, texts: &[String]) -> anyhow::Result<EmbeddingOutput> {
        self.embed_batch(texts, DEFAULT_BATCH_SIZE).await
    }

    /// Embeds `texts`, chunking inference into groups of `batch_size`.
    ///
    /// Holds the model lock for the full inference; elapsed time covers
    /// exactly the locked section. Empty input yields empty output.
    pub async fn embed_batch(
        &self,
        texts: &[String],
        batch_size: usize,
    ) -> anyhow::Result<EmbeddingOutput> {
        let active = self.active.lock().await;
        let start = Instant::now();
        let vectors = active.model.embed_batch(texts, batch_size).await?;
        let time_ms = start.elapsed().as_secs_f64() * 1000.0;

        Ok(EmbeddingOutput { vectors, time_ms })
    }

    /// Replaces the active model with a freshly loaded `name`.
    ///
    /// The load runs before the lock is taken, so embedding traffic is only
    /// paused for the pointer swap itself. On load failure the active model
    /// and history are untouched. Handle, name, and history are updated in
    /// one critical section; the history update removes any previous
    /// occurrence of `name`, pushes it to the front, and truncates to
    /// [`MAX_HISTORY`].
    pub async fn switch(&self, name: &str) -> Result<String, RegistryError> {
        let model = self.loader.load(name).await.map_err(|source| {
            warn!("Model switch to {} failed: {:#}", name, source);
            RegistryError::ModelLoad {
                name: name.to_string(),
                source,
            }
        })?;

        let mut active = self.active.lock().await;
        active.model = model;
        active.name = name.to_string();
        record_switch(&mut active.history, name, MAX_HISTORY);
        info!("Switched active model to {}", name);

        Ok(active.name.clone())
    }

    /// Reconstructs the active model from its current name, picking up
    /// on-disk changes. History is not touched.
    ///
    /// The lock is held across the load: a concurrent switch must not be
    /// able to change the name between reading it and installing the
    /// reloaded handle. On failure the prior model stays active.
    pub async fn reload_current(&self) -> Result<String, RegistryError> {
        let mut active = self.active.lock().await;
        let name = active.name.clone();

        match self.loader.load(&name).await {
            Ok(model) => {
                active.model = model;
                info!("Reloaded active model {}", name);
                Ok(name)
            }
            Err(source) => {
                warn!("Model reload of {} failed: {:#}", name, source);
                Err(RegistryError::ModelLoad { name, source })
            }
        }
    }

    /// Runs a fixed probe string through the same locked path as real
    /// traffic and returns the active model name on success.
    pub async fn probe(&self) -> anyhow::Result<String> {
        let active = self.active.lock().await;
        active
            .model
            .embed_batch(&[PROBE_TEXT.to_string()], DEFAULT_BATCH_SIZE)
            .await?;
        Ok(active.name.clone())
    }
}

/// Records a successful switch to `name` in the history list.
///
/// Removes any existing occurrence (refreshing its position), inserts the
/// name at the front, and drops the oldest entries past `max_history`.
pub fn record_switch(history: &mut Vec<String>, name: &str, max_history: usize) {
    history.retain(|entry| entry != name);
    history.insert(0, name.to_string());
    history.truncate(max_history);
}
