// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the embedding node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-model-hotswap-2026-08-23";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2026-08-23";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "bearer-auth",
    "batch-embedding",
    "model-hotswap",
    "model-reload",
    "prometheus-metrics",
    "health-probe",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("embed-node {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
