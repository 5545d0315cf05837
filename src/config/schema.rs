//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the location capture service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where and how per-day log files are stored.
    pub storage: StorageConfig,

    /// HTTP surface settings.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Storage configuration for the per-day log files.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the per-day JSON arrays.
    pub logs_dir: String,

    /// File name prefix; the full name is `<prefix><YYYY-MM-DD>.json`.
    pub file_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            logs_dir: "location_logs".to_string(),
            file_prefix: "locations_".to_string(),
        }
    }
}

/// HTTP surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// HTML page served at `/`.
    pub index_path: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Value of the `Access-Control-Allow-Origin` response header.
    pub cors_allow_origin: String,

    /// Take the client address from `X-Forwarded-For` instead of the socket.
    /// Only enable behind a proxy that sets the header.
    pub trust_forwarded_for: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            index_path: "static/index.html".to_string(),
            request_timeout_secs: 30,
            cors_allow_origin: "*".to_string(),
            trust_forwarded_for: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
