// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Server configuration read from environment variables.
//!
//! Every setting has a default so the node starts with no configuration at
//! all; a `.env` file is honored via `dotenv` before `from_env` runs.

use std::env;
use std::path::PathBuf;

/// Runtime configuration for the embedding node
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// Static bearer token protected endpoints are checked against
    pub api_token: String,
    /// Model loaded at startup (Hugging Face repo name)
    pub default_model: String,
    /// Directory searched for local ONNX model files
    pub models_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            api_token: "my-secret-token".to_string(),
            default_model: "thenlper/gte-base".to_string(),
            models_dir: PathBuf::from("./models"),
        }
    }
}

impl ServerConfig {
    /// Builds a config from environment variables, falling back to defaults.
    ///
    /// Recognized variables: `API_PORT`, `EMBED_API_TOKEN`, `DEFAULT_MODEL`,
    /// `MODELS_DIR`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_port = env::var("API_PORT").unwrap_or_else(|_| "8080".to_string());

        Self {
            listen_addr: format!("0.0.0.0:{}", api_port),
            api_token: env::var("EMBED_API_TOKEN").unwrap_or(defaults.api_token),
            default_model: env::var("DEFAULT_MODEL").unwrap_or(defaults.default_model),
            models_dir: env::var("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.models_dir),
        }
    }
}
