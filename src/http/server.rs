//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app whose fallback feeds every request to the dispatcher
//! - Wire up middleware (tracing, request timeout, request ID)
//! - Buffer request bodies within the configured limit
//! - Bind server to listener and shut down gracefully

use std::time::Duration;

use axum::{
    extract::{Request as HttpRequest, State},
    http::StatusCode,
    response::{IntoResponse, Response as HttpResponse},
    Router as AxumRouter,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::Request;
use crate::lifecycle::Shutdown;
use crate::routing::Router;

/// Application state injected into the dispatch handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub router: Router,
    pub max_body_bytes: usize,
}

/// HTTP server hosting a dispatcher [`Router`].
pub struct HttpServer {
    app: AxumRouter,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, router: Router) -> Self {
        let state = AppState {
            router,
            max_body_bytes: config.limits.max_body_bytes,
        };
        let app = Self::build_app(&config, state);
        Self { app, config }
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &AppConfig, state: AppState) -> AxumRouter {
        AxumRouter::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The Axum app, for serving it elsewhere or driving it in tests.
    pub fn app(&self) -> AxumRouter {
        self.app.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the server until `shutdown` is triggered, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let signalled = shutdown.signalled();
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                signalled.await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Buffers the body and hands the request to the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: HttpRequest) -> HttpResponse {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                path = %parts.uri.path(),
                limit = state.max_body_bytes,
                error = %e,
                "Rejected request body"
            );
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    state.router.respond(Request::from_parts(parts, body)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;
    use crate::routing::Next;
    use axum::body::Body;
    use tower::ServiceExt;

    async fn echo(req: Request, mut res: Response, _next: Next) {
        let id = req.request_id().unwrap_or("none").to_string();
        res.end(format!("{} {} {}", req.method(), req.path(), id.len()));
    }

    #[tokio::test]
    async fn test_requests_reach_dispatcher_with_request_id() {
        let server = HttpServer::new(AppConfig::default(), Router::builder().any(echo).build());

        let response = server
            .app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/Some/Path?x=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        // UUID v4 string length
        assert_eq!(&body[..], b"GET /Some/Path 36");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut config = AppConfig::default();
        config.limits.max_body_bytes = 4;
        let server = HttpServer::new(config, Router::builder().any(echo).build());

        let response = server
            .app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from("way too long"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
