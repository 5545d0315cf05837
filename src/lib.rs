//! Location capture service.
//!
//! Accepts geolocation coordinates over HTTP, appends them to a
//! date-partitioned JSON log and serves the captured records back.
//!
//! # Architecture Overview
//!
//! ```text
//!   GET /capture?lat&lon ──▶ http ──▶ capture ──▶ storage ──▶ location_logs/
//!   GET /logs[/all|/days] ─▶ http ──────────────▶ storage      locations_YYYY-MM-DD.json
//!
//!   Cross-cutting: config, observability (tracing + metrics), lifecycle
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod storage;

pub use capture::LocationRecord;
pub use config::ServiceConfig;
pub use error::Error;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use storage::LogStore;
