//! Location capture domain.
//!
//! # Data Flow
//! ```text
//! /capture query string
//!     → params.rs (CaptureQuery::validate)
//!     → record.rs (LocationRecord::new with client metadata)
//!     → storage (append to the per-day log)
//! ```

pub mod params;
pub mod record;

pub use params::{CaptureError, CaptureParams, CaptureQuery};
pub use record::{ClientInfo, LocationRecord};
