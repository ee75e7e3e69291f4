// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request types for the embedding endpoints.

use crate::embeddings::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};

/// Request body for POST /embed
///
/// # Example
/// ```json
/// { "texts": ["Hello world", "Another text"] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// Text strings to embed; an empty array is valid and yields an empty
    /// result
    pub texts: Vec<String>,
}

/// Request body for POST /embed_batch
///
/// # Example
/// ```json
/// { "texts": ["Hello world"], "batch_size": 16 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEmbedRequest {
    /// Text strings to embed
    pub texts: Vec<String>,

    /// Inference chunk size; affects throughput only, never output values
    #[serde(default)]
    pub batch_size: Option<usize>,
}

impl BatchEmbedRequest {
    /// Chunk size to run with: the requested value when it is at least 1,
    /// otherwise the default of 32.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size
            .filter(|&size| size >= 1)
            .unwrap_or(DEFAULT_BATCH_SIZE)
    }
}
