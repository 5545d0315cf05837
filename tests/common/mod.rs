//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use location_capture::config::ServiceConfig;
use location_capture::http::HttpServer;
use location_capture::lifecycle::Shutdown;
use location_sdk::LocationClient;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A running service backed by a temporary log directory.
pub struct TestService {
    pub addr: SocketAddr,
    pub client: LocationClient,
    pub shutdown: Shutdown,
    dir: TempDir,
}

#[allow(dead_code)]
impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.dir.path().join("location_logs")
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the service on an ephemeral port.
pub async fn start_service() -> TestService {
    start_service_with(|_, _| {}).await
}

/// Start the service, letting the caller adjust the config and prepare the
/// temporary directory first.
pub async fn start_service_with<F>(setup: F) -> TestService
where
    F: FnOnce(&mut ServiceConfig, &Path),
{
    let dir = tempfile::tempdir().unwrap();

    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.storage.logs_dir = dir.path().join("location_logs").to_string_lossy().into_owned();
    config.http.index_path = dir.path().join("index.html").to_string_lossy().into_owned();
    setup(&mut config, dir.path());

    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let http = reqwest::Client::builder()
        .no_proxy()
        .user_agent("location-tests/1.0")
        .build()
        .unwrap();

    TestService {
        addr,
        client: LocationClient::with_client(http, &format!("http://{}", addr)),
        shutdown,
        dir,
    }
}

/// A raw HTTP client for header-level assertions.
#[allow(dead_code)]
pub fn raw_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
