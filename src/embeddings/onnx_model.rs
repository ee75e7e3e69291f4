// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX embedding model wrapper
//!
//! Wraps an ONNX Runtime session plus a HuggingFace tokenizer into an
//! [`EmbeddingModel`]. The exported sentence-transformer graphs produce
//! token-level embeddings `[batch, seq_len, hidden_dim]`; sentence vectors
//! are obtained by attention-mask-weighted mean pooling followed by L2
//! normalization. The output dimension is detected with a probe inference
//! at load time, so any BERT-style export works (gte-base is 768, MiniLM
//! is 384).

use crate::embeddings::EmbeddingModel;
use anyhow::{Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, Axis};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use tokenizers::Tokenizer;
use tracing::info;

/// ONNX-based sentence embedding model
pub struct OnnxEmbeddingModel {
    /// ONNX Runtime session; run() needs exclusive access
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    model_name: String,
    dimension: usize,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Loads an ONNX model and its tokenizer from disk.
    ///
    /// Runs one probe inference to detect the hidden dimension and to fail
    /// fast on graphs that do not produce `[batch, seq_len, hidden_dim]`
    /// token embeddings. Blocking; callers on the async runtime should wrap
    /// this in `spawn_blocking`.
    pub fn load<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        let mut session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load ONNX model from {}",
                model_path.display()
            ))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        // Probe inference: validates the output shape and detects the
        // hidden dimension for this export.
        let probe = run_chunk(&mut session, &tokenizer, &["dimension probe".to_string()])?;
        let dimension = probe
            .first()
            .map(|v| v.len())
            .context("Probe inference produced no output")?;

        info!(
            "Loaded ONNX embedding model {} ({} dimensions)",
            model_name, dimension
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            model_name,
            dimension,
        })
    }
}

#[async_trait]
impl EmbeddingModel for OnnxEmbeddingModel {
    async fn embed_batch(&self, texts: &[String], batch_size: usize) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let chunk = batch_size.max(1);
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("ONNX session lock poisoned"))?;

        let mut vectors = Vec::with_capacity(texts.len());
        for group in texts.chunks(chunk) {
            vectors.extend(run_chunk(&mut session, &self.tokenizer, group)?);
        }

        for (i, v) in vectors.iter().enumerate() {
            if v.len() != self.dimension {
                anyhow::bail!(
                    "Unexpected embedding dimension at index {}: {} (expected {})",
                    i,
                    v.len(),
                    self.dimension
                );
            }
        }

        Ok(vectors)
    }

    fn name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Tokenizes one chunk of texts, pads to the longest sequence, runs the
/// session, and pools each row into a normalized sentence vector.
fn run_chunk(session: &mut Session, tokenizer: &Tokenizer, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(vec![]);
    }

    let encodings: Vec<_> = texts
        .iter()
        .map(|text| {
            tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
        })
        .collect::<Result<Vec<_>>>()?;

    let max_len = encodings
        .iter()
        .map(|enc| enc.get_ids().len())
        .max()
        .unwrap_or(0);

    let mut input_ids = Vec::with_capacity(texts.len() * max_len);
    let mut attention_mask = Vec::with_capacity(texts.len() * max_len);
    let mut token_type_ids = Vec::with_capacity(texts.len() * max_len);

    for encoding in &encodings {
        let ids = encoding.get_ids();
        let mask = encoding.get_attention_mask();

        input_ids.extend(ids.iter().map(|&id| id as i64));
        attention_mask.extend(mask.iter().map(|&m| m as i64));
        token_type_ids.extend(std::iter::repeat(0i64).take(ids.len()));

        let padding = max_len - ids.len();
        input_ids.extend(std::iter::repeat(0i64).take(padding));
        attention_mask.extend(std::iter::repeat(0i64).take(padding));
        token_type_ids.extend(std::iter::repeat(0i64).take(padding));
    }

    // Attention mask is reused for mean pooling after inference
    let pooling_mask = attention_mask.clone();

    let input_ids_array = Array2::from_shape_vec((texts.len(), max_len), input_ids)
        .context("Failed to create input_ids array")?;
    let attention_mask_array = Array2::from_shape_vec((texts.len(), max_len), attention_mask)
        .context("Failed to create attention_mask array")?;
    let token_type_ids_array = Array2::from_shape_vec((texts.len(), max_len), token_type_ids)
        .context("Failed to create token_type_ids array")?;

    let outputs = session.run(ort::inputs![
        "input_ids" => Value::from_array(input_ids_array)?,
        "attention_mask" => Value::from_array(attention_mask_array)?,
        "token_type_ids" => Value::from_array(token_type_ids_array)?
    ])?;

    // Index [0] rather than a name: output names vary across exports
    let output_array = outputs[0]
        .try_extract_array::<f32>()
        .context("Failed to extract output tensor")?;
    let output_shape = output_array.shape();

    if output_shape.len() != 3 {
        anyhow::bail!(
            "Model outputs unexpected shape: {:?} (expected [batch, seq_len, hidden_dim])",
            output_shape
        );
    }

    let mut vectors = Vec::with_capacity(texts.len());
    for batch_idx in 0..texts.len() {
        let token_embeddings = output_array.index_axis(Axis(0), batch_idx);
        let item_mask = &pooling_mask[batch_idx * max_len..(batch_idx + 1) * max_len];
        let mut pooled = mean_pool(&token_embeddings, item_mask);
        l2_normalize(&mut pooled);
        vectors.push(pooled);
    }

    Ok(vectors)
}

/// Attention-mask-weighted mean over the sequence dimension.
fn mean_pool(token_embeddings: &ndarray::ArrayViewD<f32>, mask: &[i64]) -> Vec<f32> {
    let seq_len = token_embeddings.shape()[0];
    let hidden_dim = token_embeddings.shape()[1];

    let mut pooled = vec![0.0f32; hidden_dim];
    let mut mask_sum = 0.0f32;

    for i in 0..seq_len {
        let weight = mask[i] as f32;
        mask_sum += weight;
        for j in 0..hidden_dim {
            pooled[j] += token_embeddings[[i, j]] * weight;
        }
    }

    for value in &mut pooled {
        *value /= mask_sum.max(1e-9);
    }

    pooled
}

/// Scales a vector to unit L2 norm in place. Zero vectors are left as-is.
fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
