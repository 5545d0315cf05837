//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), or defaults
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (PORT, LOGS_DIR)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared with the HTTP server and storage
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::{HttpConfig, ListenerConfig, ObservabilityConfig, ServiceConfig, StorageConfig};
pub use validation::ValidationError;
