//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection (peer address kept)
//!     → middleware (request ID, trace span, CORS, timeout, metrics)
//!     → handlers.rs (validate → record → storage)
//!     → response.rs (JSON envelope or error)
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{AppState, HttpServer};
