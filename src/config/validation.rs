//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, paths and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("storage.logs_dir must not be empty")]
    EmptyLogsDir,

    #[error("storage.file_prefix '{0}' must not contain a path separator")]
    InvalidFilePrefix(String),

    #[error("http.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("http.cors_allow_origin '{0}' is not a valid header value")]
    InvalidCorsOrigin(String),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("observability.log_format '{0}' is not one of pretty, json")]
    UnknownLogFormat(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.storage.logs_dir.trim().is_empty() {
        errors.push(ValidationError::EmptyLogsDir);
    }

    if config.storage.file_prefix.contains(['/', '\\']) {
        errors.push(ValidationError::InvalidFilePrefix(
            config.storage.file_prefix.clone(),
        ));
    }

    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if HeaderValue::from_str(&config.http.cors_allow_origin).is_err() {
        errors.push(ValidationError::InvalidCorsOrigin(
            config.http.cors_allow_origin.clone(),
        ));
    }

    let obs = &config.observability;
    if !LOG_LEVELS.contains(&obs.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(obs.log_level.clone()));
    }
    if !LOG_FORMATS.contains(&obs.log_format.to_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogFormat(obs.log_format.clone()));
    }
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: obs.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
