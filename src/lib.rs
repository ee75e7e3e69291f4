// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod embeddings;
pub mod monitoring;
pub mod version;

// Re-export main types
pub use api::{build_router, start_server, ApiError, AppState};
pub use config::ServerConfig;
pub use embeddings::{
    EmbeddingModel, EmbeddingOutput, HashEmbeddingModel, HashModelLoader, ModelLoader,
    ModelRegistry, OnnxEmbeddingModel, OnnxModelLoader, RegistryError, DEFAULT_BATCH_SIZE,
    MAX_HISTORY,
};
pub use monitoring::HttpMetrics;
