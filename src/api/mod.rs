// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTTP surface: router, auth middleware, handlers, and error rendering.

pub mod auth;
pub mod embed;
pub mod errors;
pub mod handlers;
pub mod server;

pub use errors::{ApiError, ErrorResponse};
pub use server::{build_router, start_server, AppState};
