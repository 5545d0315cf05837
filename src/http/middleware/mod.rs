//! Tower/axum middleware applied to every route.

pub mod cors;
pub mod metrics;

pub use cors::{allow_headers_layer, allow_origin_layer};
pub use self::metrics::track_metrics;
