//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::http::{Method, StatusCode};
use tokio::net::TcpListener;

use copilot::{AppConfig, HttpServer, Request, Router, Shutdown};

/// Dispatch one request through `router` without a socket.
#[allow(dead_code)]
pub async fn call(router: &Router, method: Method, url: &str) -> (StatusCode, String) {
    let response = router.respond(Request::new(method, url)).await;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Serve `router` on an ephemeral port. Trigger the returned `Shutdown` to stop.
#[allow(dead_code)]
pub async fn start_server(config: AppConfig, router: Router) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let server = HttpServer::new(config, router);
    let stop = shutdown.clone();
    tokio::spawn(async move {
        server.run(listener, stop).await.unwrap();
    });

    (addr, shutdown)
}

/// Ordered record of what handlers did, shared between closures.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct Trail(Arc<Mutex<Vec<String>>>);

#[allow(dead_code)]
impl Trail {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}
