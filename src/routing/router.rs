//! Layer registry and dispatch entry points.
//!
//! # Responsibilities
//! - Append layers in registration order (`RouterBuilder`)
//! - Freeze them into an immutable, cheaply clonable `Router`
//! - Start a dispatch chain for each request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) prefix scan in registration order (acceptable for typical layer counts)
//! - First eligible layer wins; registration order is the only priority

use std::fmt;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tracing::Instrument;

use crate::handler::{ErrorMiddleware, Middleware};
use crate::http::target::normalize;
use crate::http::terminal::{DefaultTerminal, Terminal};
use crate::http::{Request, Response};
use crate::routing::dispatch::{DispatchState, Next};
use crate::routing::layer::{Layer, Mount};

/// Collects layers before the router is frozen.
pub struct RouterBuilder {
    layers: Vec<Layer>,
    terminal: Option<Arc<dyn Terminal>>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            terminal: None,
        }
    }

    /// Register one layer.
    pub fn mount(mut self, mount: Mount) -> Self {
        self.layers.push(Layer::from_mount(mount));
        self
    }

    /// Handler for every path and method.
    pub fn any(self, handler: impl Middleware) -> Self {
        self.mount(Mount::normal(handler))
    }

    /// Handler for every method under `route`.
    pub fn route(self, route: impl Into<String>, handler: impl Middleware) -> Self {
        self.mount(Mount::normal(handler).at(route))
    }

    /// Handler for `method` under `route`.
    pub fn on(self, method: Method, route: impl Into<String>, handler: impl Middleware) -> Self {
        self.mount(Mount::normal(handler).at(route).method(method))
    }

    /// Recovery handler for every path and method.
    pub fn recover(self, handler: impl ErrorMiddleware) -> Self {
        self.mount(Mount::recover(handler))
    }

    /// Replace the default terminal handler.
    pub fn terminal(mut self, terminal: impl Terminal) -> Self {
        self.terminal = Some(Arc::new(terminal));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn build(self) -> Router {
        let terminal = self
            .terminal
            .unwrap_or_else(|| Arc::new(DefaultTerminal::new()));
        Router {
            layers: self.layers.into(),
            terminal,
        }
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("layers", &self.layers)
            .finish_non_exhaustive()
    }
}

/// Frozen, ordered set of layers.
#[derive(Clone)]
pub struct Router {
    layers: Arc<[Layer]>,
    terminal: Arc<dyn Terminal>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Dispatch with the router's terminal.
    pub fn dispatch(&self, req: Request, res: Response) -> BoxFuture<'static, ()> {
        self.dispatch_with(req, res, Arc::clone(&self.terminal))
    }

    /// Dispatch with a specific terminal handler.
    ///
    /// The returned future completes when the handler chain returns, which
    /// may be before the response is finished (the terminal runs on its own
    /// task).
    pub fn dispatch_with(
        &self,
        mut req: Request,
        res: Response,
        terminal: Arc<dyn Terminal>,
    ) -> BoxFuture<'static, ()> {
        let target = normalize(req.url());
        req.set_target(target);

        tracing::debug!(method = %req.method(), path = %req.path(), "Dispatching request");

        let state = DispatchState::new(req.path());
        Next::new(Arc::clone(&self.layers), terminal, state).run(req, res)
    }

    /// Run the chain on its own task and wait for the finished response.
    ///
    /// A chain that drops the response without finishing it yields 500.
    pub async fn respond(&self, mut req: Request) -> axum::response::Response {
        req.ensure_request_id();
        let span = tracing::debug_span!(
            "dispatch",
            method = %req.method(),
            url = %req.url(),
            request_id = req.request_id().unwrap_or_default(),
        );

        let (res, rx) = Response::channel();
        tokio::spawn(self.dispatch(req, res).instrument(span.clone()));

        match rx.instrument(span).await {
            Ok(response) => response,
            Err(_) => {
                tracing::warn!("Handler chain dropped the response without finishing it");
                let mut response = axum::response::Response::new(axum::body::Body::from(
                    "Internal Server Error",
                ));
                *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("layers", &self.layers)
            .finish_non_exhaustive()
    }
}
