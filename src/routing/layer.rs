//! Registration entries.

use std::sync::Arc;

use crate::handler::{ErrorMiddleware, Handler, Middleware};
use crate::routing::matcher::{MatchTarget, Matcher, MethodFilter, PrefixMatcher};

/// Registration configuration for one layer.
///
/// Starts from a handler; route, method and further sequence entries are
/// optional:
///
/// ```rust,no_run
/// use axum::http::Method;
/// use copilot::{Mount, Next, Request, Response};
///
/// async fn first(req: Request, res: Response, next: Next) {
///     next.run(req, res).await
/// }
///
/// async fn second(_req: Request, mut res: Response, _next: Next) {
///     res.end("Success");
/// }
///
/// let mount = Mount::normal(first)
///     .then(second)
///     .at("/multi/handler")
///     .method(Method::GET);
/// ```
#[derive(Debug, Clone)]
pub struct Mount {
    method: MethodFilter,
    route: Option<String>,
    handlers: Vec<Handler>,
}

impl Mount {
    pub fn new(handler: Handler) -> Self {
        Self {
            method: MethodFilter::Any,
            route: None,
            handlers: vec![handler],
        }
    }

    pub fn normal(handler: impl Middleware) -> Self {
        Self::new(Handler::normal(handler))
    }

    pub fn recover(handler: impl ErrorMiddleware) -> Self {
        Self::new(Handler::recover(handler))
    }

    /// Restrict the layer to a route prefix.
    pub fn at(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Restrict the layer to one method (`MethodFilter::Any` lifts it).
    pub fn method(mut self, method: impl Into<MethodFilter>) -> Self {
        self.method = method.into();
        self
    }

    /// Append an entry to the layer's handler sequence.
    pub fn then_handler(mut self, handler: Handler) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn then(self, handler: impl Middleware) -> Self {
        self.then_handler(Handler::normal(handler))
    }

    pub fn then_recover(self, handler: impl ErrorMiddleware) -> Self {
        self.then_handler(Handler::recover(handler))
    }
}

/// One frozen registry entry.
#[derive(Debug)]
pub struct Layer {
    method: MethodFilter,
    prefix: PrefixMatcher,
    route: Arc<str>,
    handlers: Vec<Handler>,
}

impl Layer {
    pub(crate) fn from_mount(mount: Mount) -> Self {
        let route = mount.route.unwrap_or_else(|| "/".to_string());
        Self {
            method: mount.method,
            prefix: PrefixMatcher::new(&route),
            route: Arc::from(route),
            handlers: mount.handlers,
        }
    }

    pub fn method(&self) -> &MethodFilter {
        &self.method
    }

    /// Lower-cased prefix used for matching.
    pub fn match_key(&self) -> &str {
        self.prefix.key()
    }

    /// The route as registered.
    pub fn route(&self) -> &str {
        &self.route
    }

    pub(crate) fn route_arc(&self) -> &Arc<str> {
        &self.route
    }

    /// Never empty.
    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }
}

impl Matcher for Layer {
    fn matches(&self, target: &MatchTarget<'_>) -> bool {
        self.prefix.matches(target) && self.method.matches(target)
    }
}
