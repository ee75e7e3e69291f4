// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Router construction and server lifecycle.

use crate::api::auth::require_bearer;
use crate::api::embed::{embed_batch_handler, embed_handler};
use crate::api::handlers::{
    healthz_handler, metrics_handler, reload_model_handler, shutdown_handler,
    switch_model_handler, version_handler,
};
use crate::embeddings::ModelRegistry;
use crate::monitoring::HttpMetrics;
use anyhow::Result;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared state handed to every handler.
///
/// The registry is the single owner of the active model; handlers never
/// hold model state of their own.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub metrics: Arc<HttpMetrics>,
    pub api_token: Arc<str>,
    pub shutdown: watch::Sender<bool>,
}

impl AppState {
    pub fn new(registry: Arc<ModelRegistry>, api_token: &str) -> Result<Self> {
        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            registry,
            metrics: Arc::new(HttpMetrics::new()?),
            api_token: Arc::from(api_token),
            shutdown,
        })
    }

    /// Receiver that fires when /shutdown has been called
    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}

/// Builds the full application router.
///
/// Everything except /metrics and /version sits behind the bearer-token
/// middleware; the metrics/logging middleware wraps all routes.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/embed", post(embed_handler))
        .route("/embed_batch", post(embed_batch_handler))
        .route("/switch_model", post(switch_model_handler))
        .route("/reload_model_from_disk", post(reload_model_handler))
        .route("/shutdown", post(shutdown_handler))
        .route("/healthz", get(healthz_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    let open = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/version", get(version_handler));

    Router::new()
        .merge(protected)
        .merge(open)
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Middleware recording one log line and one metrics observation per
/// request.
async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    info!(
        "{} {} {} {:.2}ms",
        method,
        path,
        response.status().as_u16(),
        elapsed.as_secs_f64() * 1000.0
    );
    state.metrics.observe(method.as_str(), &path, elapsed.as_secs_f64());

    response
}

/// Binds the listener and serves until /shutdown or Ctrl-C.
///
/// Shutdown is not graceful: the serve future is dropped, cutting off any
/// in-flight work.
pub async fn start_server(state: AppState, listen_addr: &str) -> Result<()> {
    let mut shutdown_rx = state.subscribe_shutdown();
    let addr: SocketAddr = listen_addr.parse()?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = shutdown_rx.changed() => {
            info!("Shutdown signal received, stopping server");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, stopping server");
        }
    }

    Ok(())
}
