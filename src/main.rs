// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use embed_node::{
    api::{start_server, AppState},
    config::ServerConfig,
    embeddings::{ModelRegistry, OnnxModelLoader},
    version,
};
use std::{env, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("Starting {}", version::get_version_string());

    let config = ServerConfig::from_env();
    info!(
        "Loading default model {} (models dir: {})",
        config.default_model,
        config.models_dir.display()
    );

    let loader = Arc::new(OnnxModelLoader::new(config.models_dir.clone()));
    let registry = Arc::new(ModelRegistry::new(loader, &config.default_model).await?);

    let state = AppState::new(registry, &config.api_token)?;
    start_server(state, &config.listen_addr).await
}
