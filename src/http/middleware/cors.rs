//! CORS response headers.
//!
//! Browsers on other origins load the capture page and call `/capture`, so
//! every response carries a permissive `Access-Control-Allow-*` pair.

use axum::http::{header, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOWED_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept";

/// Layer setting `Access-Control-Allow-Origin` to `origin`.
pub fn allow_origin_layer(origin: HeaderValue) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin)
}

/// Layer setting `Access-Control-Allow-Headers`.
pub fn allow_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    )
}
