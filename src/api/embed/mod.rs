// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API module
//!
//! Provides the POST /embed and POST /embed_batch endpoints backed by the
//! model registry.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{embed_batch_handler, embed_handler};
pub use request::{BatchEmbedRequest, EmbedRequest};
pub use response::EmbedResponse;
