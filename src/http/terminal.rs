//! Terminal handler: what happens once no layer is left.
//!
//! # Design Decisions
//! - Runs on its own task, never inside the frame that exhausted the chain
//! - Replaceable per router and per dispatch
//! - The default never overwrites a response a handler already finished

use std::future::Future;

use axum::http::{header, HeaderValue, StatusCode};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::handler::HandlerError;
use crate::http::{Request, Response};

/// Invoked once the registry is exhausted, with the pending error (if any).
pub trait Terminal: Send + Sync + 'static {
    fn finish(
        &self,
        error: Option<HandlerError>,
        req: Request,
        res: Response,
    ) -> BoxFuture<'static, ()>;
}

impl<F, Fut> Terminal for F
where
    F: Fn(Option<HandlerError>, Request, Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn finish(
        &self,
        error: Option<HandlerError>,
        req: Request,
        res: Response,
    ) -> BoxFuture<'static, ()> {
        (self)(error, req, res).boxed()
    }
}

/// Default terminal: 404 without an error, the error's status with one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTerminal {
    expose_errors: bool,
}

impl DefaultTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the error message in the body instead of the reason phrase.
    pub fn expose_errors(mut self, expose: bool) -> Self {
        self.expose_errors = expose;
        self
    }

    fn respond(&self, error: Option<HandlerError>, req: &Request, res: &mut Response) {
        if res.is_finished() {
            tracing::debug!(path = %req.path(), "Chain exhausted after response was sent");
            return;
        }

        res.set_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );

        match error {
            None => {
                tracing::debug!(method = %req.method(), path = %req.path(), "No layer answered");
                res.set_status(StatusCode::NOT_FOUND);
                res.end(format!("Cannot {} {}", req.method(), req.path()));
            }
            Some(err) => {
                let status = err.status_code();
                if status.is_server_error() {
                    tracing::error!(
                        status = %status,
                        path = %req.path(),
                        error = %err,
                        "Unhandled error"
                    );
                } else {
                    tracing::warn!(
                        status = %status,
                        path = %req.path(),
                        error = %err,
                        "Unhandled error"
                    );
                }

                res.set_status(status);
                let body = if self.expose_errors {
                    err.message().to_string()
                } else {
                    status.canonical_reason().unwrap_or("Error").to_string()
                };
                res.end(body);
            }
        }
    }
}

impl Terminal for DefaultTerminal {
    fn finish(
        &self,
        error: Option<HandlerError>,
        req: Request,
        mut res: Response,
    ) -> BoxFuture<'static, ()> {
        self.respond(error, &req, &mut res);
        futures_util::future::ready(()).boxed()
    }
}
