// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Deterministic hash-seeded embedding model.
//!
//! Produces stable pseudo-random unit vectors from a hash of the model
//! name and input text. No model files or network access required, which
//! makes it the backend for tests and offline development runs. Vectors
//! from two differently named models never collide, so callers can tell
//! which model produced a given output.

use crate::embeddings::{EmbeddingModel, ModelLoader};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Embedding model backed by a seeded pseudo-random generator
#[derive(Debug)]
pub struct HashEmbeddingModel {
    name: String,
    dimension: usize,
    embed_calls: AtomicUsize,
}

impl HashEmbeddingModel {
    pub fn new(name: impl Into<String>, dimension: usize) -> Self {
        Self {
            name: name.into(),
            dimension,
            embed_calls: AtomicUsize::new(0),
        }
    }

    /// Number of embed_batch invocations served by this instance
    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        self.name.hash(&mut hasher);
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimension);
        let mut current = seed;
        for i in 0..self.dimension {
            // Linear congruential step, deterministic per (name, text, i)
            current = (current.wrapping_mul(1664525).wrapping_add(1013904223)) ^ (i as u64);
            let value = (current as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);
        }

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut embedding {
                *value /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingModel for HashEmbeddingModel {
    async fn embed_batch(&self, texts: &[String], batch_size: usize) -> Result<Vec<Vec<f32>>> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);

        // Chunking cannot change values here, but mirror the real model's
        // traversal so batch-size behavior is exercised the same way.
        let mut vectors = Vec::with_capacity(texts.len());
        for group in texts.chunks(batch_size.max(1)) {
            for text in group {
                vectors.push(self.generate(text));
            }
        }
        Ok(vectors)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Loader producing [`HashEmbeddingModel`] instances.
///
/// By default any name loads; `with_known_models` restricts the namespace
/// so unknown names fail the way a bad Hub identifier would.
#[derive(Debug)]
pub struct HashModelLoader {
    dimension: usize,
    known_models: Mutex<Option<Vec<String>>>,
    load_calls: AtomicUsize,
}

impl HashModelLoader {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            known_models: Mutex::new(None),
            load_calls: AtomicUsize::new(0),
        }
    }

    /// Restricts loadable names to the given set
    pub fn with_known_models(self, names: &[&str]) -> Self {
        *self.known_models.lock().unwrap() = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Removes a name from the known set, making future loads of it fail.
    /// Simulates a model disappearing from disk between loads.
    pub fn forget(&self, name: &str) {
        if let Some(known) = self.known_models.lock().unwrap().as_mut() {
            known.retain(|n| n != name);
        }
    }

    /// Number of load attempts made through this loader
    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelLoader for HashModelLoader {
    async fn load(&self, name: &str) -> Result<Arc<dyn EmbeddingModel>> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(known) = self.known_models.lock().unwrap().as_ref() {
            if !known.iter().any(|n| n == name) {
                return Err(anyhow!("Unknown model identifier: {}", name));
            }
        }

        Ok(Arc::new(HashEmbeddingModel::new(name, self.dimension)))
    }
}
