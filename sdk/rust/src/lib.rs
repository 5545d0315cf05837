//! Typed client for the location capture service.

mod client;

pub use client::{
    CaptureRequest, CaptureResponse, HealthResponse, ListResponse, LocationClient,
    LocationRecord, SdkError,
};
