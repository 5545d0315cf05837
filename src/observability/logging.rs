//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level at runtime
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - Log level configurable via config; `RUST_LOG` takes precedence

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::ObservabilityConfig;

/// Default filter directives for a configured level.
pub fn default_directives(level: &str) -> String {
    let level = level.to_lowercase();
    format!("location_capture={level},tower_http={level}")
}

/// Install the global tracing subscriber.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(&config.log_level).into());

    let format = if config.log_format.eq_ignore_ascii_case("json") {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(format)
        .with(filter)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives("DEBUG"),
            "location_capture=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_second_init_is_a_startup_error() {
        let config = ObservabilityConfig::default();
        let _ = init_logging(&config);

        let err = crate::Error::from(init_logging(&config).unwrap_err());
        assert!(matches!(err, crate::Error::Logging(_)));
        assert!(err.to_string().starts_with("failed to initialize logging"));
    }
}
