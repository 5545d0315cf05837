//! Configuration loading from disk and environment.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("environment variable {name}='{value}' is invalid")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `PORT` and `LOGS_DIR` overrides from the process environment.
pub fn apply_env_overrides(config: &mut ServiceConfig) -> Result<(), ConfigError> {
    apply_overrides_from(config, |name| std::env::var(name).ok())
}

/// Apply environment-style overrides using the given lookup.
pub fn apply_overrides_from<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            name: "PORT",
            value: port.clone(),
        })?;
        set_port(config, port);
    }

    if let Some(dir) = lookup("LOGS_DIR").filter(|d| !d.trim().is_empty()) {
        config.storage.logs_dir = dir;
    }

    Ok(())
}

/// Replace the port of the listener bind address, keeping its host.
pub fn set_port(config: &mut ServiceConfig, port: u16) {
    let bind = &mut config.listener.bind_address;
    match bind.parse::<SocketAddr>() {
        Ok(mut addr) => {
            addr.set_port(port);
            *bind = addr.to_string();
        }
        Err(_) => {
            let host = bind.rsplit_once(':').map_or(bind.as_str(), |(h, _)| h);
            *bind = format!("{}:{}", host, port);
        }
    }
}

/// Resolve the effective configuration: file (or defaults), then
/// environment, then `overrides` (command line), then validation.
pub fn resolve_config<F>(path: Option<&Path>, overrides: F) -> Result<ServiceConfig, ConfigError>
where
    F: FnOnce(&mut ServiceConfig),
{
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => ServiceConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
