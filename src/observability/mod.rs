//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and storage produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the request span
//! - Metrics are optional and cheap when disabled

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
