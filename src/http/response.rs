//! JSON response envelopes and HTTP error mapping.
//!
//! Every JSON body carries a `success` flag. Successful reads add `count`
//! and `data`; failures carry a single `error` message. Internal error
//! detail goes to the log, never to the client.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::capture::{CaptureError, LocationRecord};
use crate::storage::StorageError;

pub const CAPTURED_MESSAGE: &str = "Location captured and logged successfully";

/// Body of a successful `/capture`.
#[derive(Debug, Serialize)]
pub struct CaptureEnvelope {
    pub success: bool,
    pub message: &'static str,
    pub data: LocationRecord,
}

impl CaptureEnvelope {
    pub fn new(data: LocationRecord) -> Self {
        Self {
            success: true,
            message: CAPTURED_MESSAGE,
            data,
        }
    }
}

/// Body of a successful list endpoint.
#[derive(Debug, Serialize)]
pub struct ListEnvelope<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListEnvelope<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid query string")]
    InvalidQuery(#[from] QueryRejection),

    /// A storage failure; `message` is what the client sees.
    #[error("{message}")]
    Storage {
        message: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("Not found")]
    NotFound,
}

impl ApiError {
    pub fn storage(message: &'static str, source: StorageError) -> Self {
        ApiError::Storage { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Capture(_) | ApiError::InvalidDate(_) | ApiError::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage { message, source } = &self {
            tracing::error!(error = %source, "{}", message);
        }

        let body = ErrorEnvelope {
            success: false,
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
