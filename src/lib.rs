//! Express-style middleware dispatcher on Tokio and Axum.
//!
//! Layers are registered in order with a route prefix, an optional method
//! filter and one or more handlers. Each request walks the layers from the
//! first; a handler either answers or hands control onward through [`Next`].
//! Errors raised with [`Next::fail`] skip normal handlers until a recovery
//! handler takes them. When the registry runs out, the terminal handler
//! answers on its own task.

pub mod config;
pub mod demo;
pub mod handler;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::AppConfig;
pub use handler::{ErrorMiddleware, Handler, HandlerError, HandlerKind, Middleware};
pub use http::{DefaultTerminal, HttpServer, Request, Response, Terminal};
pub use lifecycle::Shutdown;
pub use routing::{MethodFilter, Mount, Next, Router, RouterBuilder};
