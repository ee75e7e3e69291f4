// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Prometheus metrics for the HTTP surface.
//!
//! One request counter and one latency histogram, labeled by method and
//! endpoint. The metrics own a per-process `prometheus::Registry` carried
//! in application state rather than a global, so tests get isolated
//! registries.

use anyhow::{Context, Result};
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Content type of the Prometheus text exposition format
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Request counters and latency histograms for the API
#[derive(Debug, Clone)]
pub struct HttpMetrics {
    registry: Registry,
    requests: IntCounterVec,
    duration: HistogramVec,
}

impl HttpMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("api_requests_total", "Total API requests"),
            &["method", "endpoint"],
        )
        .context("Failed to create request counter")?;

        let duration = HistogramVec::new(
            HistogramOpts::new("api_request_duration_seconds", "API response time"),
            &["method", "endpoint"],
        )
        .context("Failed to create duration histogram")?;

        registry
            .register(Box::new(requests.clone()))
            .context("Failed to register request counter")?;
        registry
            .register(Box::new(duration.clone()))
            .context("Failed to register duration histogram")?;

        Ok(Self {
            registry,
            requests,
            duration,
        })
    }

    /// Records one completed request.
    pub fn observe(&self, method: &str, endpoint: &str, seconds: f64) {
        self.requests.with_label_values(&[method, endpoint]).inc();
        self.duration
            .with_label_values(&[method, endpoint])
            .observe(seconds);
    }

    /// Renders all registered metrics in the text exposition format.
    pub fn export(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        encoder
            .encode_to_string(&self.registry.gather())
            .context("Failed to encode metrics")
    }
}
