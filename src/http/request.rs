//! The request context handed to handlers.
//!
//! # Responsibilities
//! - Carry method, original target, headers and the buffered body
//! - Expose the normalized path and query produced by `target.rs`
//! - Expose the display route of the layer currently running
//! - Typed extensions so earlier handlers can pass values to later ones
//!
//! # Design Decisions
//! - `path()` keeps the original (decoded) case; matching lower-cases a copy
//! - Body is fully buffered by the host before dispatch

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{request::Parts, Extensions, HeaderMap, HeaderValue, Method};
use uuid::Uuid;

use crate::http::target::{Query, Target};

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// A request travelling through the dispatcher.
#[derive(Debug)]
pub struct Request {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Bytes,
    path: String,
    query: Query,
    route: Arc<str>,
    extensions: Extensions,
}

impl Request {
    /// Create a request for `method` and the raw request target `url`.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            path: "/".to_string(),
            query: Query::default(),
            route: Arc::from(""),
            extensions: Extensions::new(),
        }
    }

    /// Build a request from the host's request head and buffered body.
    pub fn from_parts(parts: Parts, body: Bytes) -> Self {
        let url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.to_string());

        Self {
            method: parts.method,
            url,
            headers: parts.headers,
            body,
            path: "/".to_string(),
            query: Query::default(),
            route: Arc::from(""),
            extensions: parts.extensions,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The raw request target as received (path and query, undecoded).
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decoded request path, original case. Always starts with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Display route of the layer whose handler is running.
    ///
    /// Empty until the first layer matches.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Correlation id assigned by the host, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
    }

    /// Assign a UUID v4 correlation id unless the host already set one.
    pub fn ensure_request_id(&mut self) {
        if self.request_id().is_some() {
            return;
        }
        if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
            self.headers.insert(X_REQUEST_ID, value);
        }
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    pub(crate) fn set_target(&mut self, target: Target) {
        self.path = target.path;
        self.query = target.query;
    }

    pub(crate) fn set_route(&mut self, route: &Arc<str>) {
        self.route = Arc::clone(route);
    }
}
