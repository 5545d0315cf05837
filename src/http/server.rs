//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, timeout, metrics)
//! - Bind server to listener with peer address info
//! - Graceful shutdown on the lifecycle broadcast signal

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::middleware::{allow_headers_layer, allow_origin_layer, track_metrics};
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown::wait as wait_for_shutdown;
use crate::storage::{LogStore, StorageError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LogStore>,
    pub config: Arc<ServiceConfig>,
}

/// HTTP server for the location capture service.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Open the log store and build the router.
    pub fn new(config: ServiceConfig) -> Result<Self, StorageError> {
        let store = Arc::new(LogStore::open(&config.storage)?);
        let state = AppState {
            store,
            config: Arc::new(config),
        };

        let router = Self::build_router(state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let routes = Router::new()
            .route("/", get(handlers::index))
            .route("/capture", get(handlers::capture))
            .route("/logs", get(handlers::logs))
            .route("/logs/all", get(handlers::all_logs))
            .route("/logs/days", get(handlers::days))
            .route("/health", get(handlers::health));

        Self::with_layers(routes, state)
    }

    /// Wrap `routes` in the metrics, fallback and request middleware stack.
    #[allow(deprecated)]
    fn with_layers(routes: Router<AppState>, state: AppState) -> Router {
        let http = &state.config.http;
        let origin = HeaderValue::from_str(&http.cors_allow_origin).unwrap_or_else(|_| {
            tracing::warn!(
                origin = %http.cors_allow_origin,
                "Invalid CORS origin, falling back to '*'"
            );
            HeaderValue::from_static("*")
        });
        let timeout = Duration::from_secs(http.request_timeout_secs);

        let layers = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(propagate_request_id_layer())
            .layer(allow_origin_layer(origin))
            .layer(allow_headers_layer())
            .layer(TimeoutLayer::new(timeout));

        routes
            .route_layer(middleware::from_fn(track_metrics))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(layers)
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn store(&self) -> &Arc<LogStore> {
        &self.state.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.state.config
    }

    /// Serve until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                wait_for_shutdown(shutdown).await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn server(timeout_secs: u64) -> (HttpServer, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ServiceConfig::default();
        config.storage.logs_dir = dir.path().join("logs").to_string_lossy().into_owned();
        config.http.request_timeout_secs = timeout_secs;
        (HttpServer::new(config).unwrap(), dir)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_router_captures_in_process() {
        let (server, _dir) = server(30);

        let res = server
            .router()
            .oneshot(get_request("/capture?lat=1&lon=2"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["ip"], "unknown");
        assert_eq!(json["data"]["latitude"], 1.0);

        let stored = server.store().read_all().await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_slow_request_times_out() {
        let (server, _dir) = server(1);
        let routes = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        );
        let router = HttpServer::with_layers(routes, server.state.clone());

        let res = router.oneshot(get_request("/slow")).await.unwrap();
        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(res.headers()["access-control-allow-origin"], "*");
    }
}
