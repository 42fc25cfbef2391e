//! Handler kinds and invocation.
//!
//! # Data Flow
//! ```text
//! Eligible layer (routing::dispatch)
//!     → match (Handler, pending error)
//!         Normal(req, res, next)          only while no error is pending
//!         Recover(err, req, res, next)    only while an error is pending
//!         anything else                   skipped, sequence abandoned
//! ```
//!
//! # Design Decisions
//! - The kind is chosen at registration time, never inferred
//! - Any `Fn` (including `async fn`) with a matching argument list is a handler
//! - Handlers return `()`: errors travel through `Next::fail`, not return values

pub mod error;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::http::{Request, Response};
use crate::routing::Next;

pub use error::{BoxError, HandlerError};

/// A handler that participates while no error is pending.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, res: Response, next: Next) -> BoxFuture<'static, ()>;
}

impl<F, Fut> Middleware for F
where
    F: Fn(Request, Response, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn call(&self, req: Request, res: Response, next: Next) -> BoxFuture<'static, ()> {
        (self)(req, res, next).boxed()
    }
}

/// A handler that participates only while an error is pending.
///
/// It receives the pending error by value. Calling `next.run(..)` recovers;
/// `next.fail(err, ..)` keeps the chain in error mode.
pub trait ErrorMiddleware: Send + Sync + 'static {
    fn call(
        &self,
        err: HandlerError,
        req: Request,
        res: Response,
        next: Next,
    ) -> BoxFuture<'static, ()>;
}

impl<F, Fut> ErrorMiddleware for F
where
    F: Fn(HandlerError, Request, Response, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn call(
        &self,
        err: HandlerError,
        req: Request,
        res: Response,
        next: Next,
    ) -> BoxFuture<'static, ()> {
        (self)(err, req, res, next).boxed()
    }
}

/// Which error state a handler participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Normal,
    Recover,
}

/// A registered handler, tagged with its kind.
#[derive(Clone)]
pub enum Handler {
    Normal(Arc<dyn Middleware>),
    Recover(Arc<dyn ErrorMiddleware>),
}

impl Handler {
    pub fn normal(handler: impl Middleware) -> Self {
        Handler::Normal(Arc::new(handler))
    }

    pub fn recover(handler: impl ErrorMiddleware) -> Self {
        Handler::Recover(Arc::new(handler))
    }

    pub fn kind(&self) -> HandlerKind {
        match self {
            Handler::Normal(_) => HandlerKind::Normal,
            Handler::Recover(_) => HandlerKind::Recover,
        }
    }

    /// Whether this handler may run given the pending error state.
    pub fn accepts(&self, error: Option<&HandlerError>) -> bool {
        matches!(
            (self.kind(), error),
            (HandlerKind::Normal, None) | (HandlerKind::Recover, Some(_))
        )
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.kind()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn plain(_req: Request, _res: Response, _next: Next) {}

    async fn recovery(_err: HandlerError, _req: Request, _res: Response, _next: Next) {}

    #[test]
    fn test_kind_is_explicit() {
        assert_eq!(Handler::normal(plain).kind(), HandlerKind::Normal);
        assert_eq!(Handler::recover(recovery).kind(), HandlerKind::Recover);
    }

    #[test]
    fn test_accepts_gates_on_error_state() {
        let err = HandlerError::new("x");

        let normal = Handler::normal(plain);
        assert!(normal.accepts(None));
        assert!(!normal.accepts(Some(&err)));

        let recover = Handler::recover(recovery);
        assert!(!recover.accepts(None));
        assert!(recover.accepts(Some(&err)));
    }

    #[test]
    fn test_debug_shows_kind() {
        assert_eq!(format!("{:?}", Handler::recover(recovery)), "Handler(Recover)");
    }
}
