// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response type for the embedding endpoints.

use crate::embeddings::EmbeddingOutput;
use serde::{Deserialize, Serialize};

/// Response body for POST /embed and POST /embed_batch
///
/// # Example
/// ```json
/// { "embeddings": [[0.1, 0.2]], "time_ms": 12.34 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    /// One vector per input text, in input order
    pub embeddings: Vec<Vec<f32>>,

    /// Wall-clock time of the locked inference section, in milliseconds
    pub time_ms: f64,
}

impl From<EmbeddingOutput> for EmbedResponse {
    fn from(output: EmbeddingOutput) -> Self {
        Self {
            embeddings: output.vectors,
            // Two decimal places, matching the logged request timings
            time_ms: (output.time_ms * 100.0).round() / 100.0,
        }
    }
}
