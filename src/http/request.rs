//! Request metadata: request IDs and client identification.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - `X-Forwarded-For` is ignored unless explicitly trusted

use std::net::SocketAddr;

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, Request},
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::Span;

use crate::capture::ClientInfo;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Recorded address when the peer is unknown, as when the router is driven
/// in-process without connection info.
pub const UNKNOWN_IP: &str = "unknown";

/// Layer that assigns a UUID v4 `x-request-id` to requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer that copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Span for one HTTP request, tagged with its request ID.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request.headers()),
    )
}

/// Identify the submitting client.
pub fn client_info(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> ClientInfo {
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let forwarded = trust_forwarded_for
        .then(|| forwarded_client(headers))
        .flatten();

    ClientInfo {
        user_agent,
        ip: forwarded
            .or_else(|| peer.map(|addr| addr.ip().to_canonical().to_string()))
            .unwrap_or_else(|| UNKNOWN_IP.to_string()),
    }
}

fn forwarded_client(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "[::ffff:192.0.2.10]:51000".parse().unwrap()
    }

    #[test]
    fn test_peer_address_is_canonical() {
        let info = client_info(&HeaderMap::new(), Some(peer()), false);
        assert_eq!(info.ip, "192.0.2.10");
        assert_eq!(info.user_agent, None);
    }

    #[test]
    fn test_forwarded_for_ignored_unless_trusted() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("198.51.100.1, 10.0.0.1"));
        headers.insert("user-agent", HeaderValue::from_static("curl/8.0"));

        let untrusted = client_info(&headers, Some(peer()), false);
        assert_eq!(untrusted.ip, "192.0.2.10");
        assert_eq!(untrusted.user_agent.as_deref(), Some("curl/8.0"));

        let trusted = client_info(&headers, Some(peer()), true);
        assert_eq!(trusted.ip, "198.51.100.1");
    }

    #[test]
    fn test_empty_forwarded_for_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static(" , "));
        assert_eq!(client_info(&headers, Some(peer()), true).ip, "192.0.2.10");
    }

    #[test]
    fn test_missing_peer_is_unknown() {
        assert_eq!(client_info(&HeaderMap::new(), None, false).ip, UNKNOWN_IP);

        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("198.51.100.7"));
        assert_eq!(client_info(&headers, None, true).ip, "198.51.100.7");
    }

    #[test]
    fn test_request_id_default() {
        assert_eq!(request_id(&HeaderMap::new()), "unknown");
    }
}
