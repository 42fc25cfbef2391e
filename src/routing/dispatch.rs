//! The continuation and its per-request state.
//!
//! # Responsibilities
//! - Walk the registry from the cursor, skipping layers that do not match
//! - Step through a layer's handler sequence before leaving the layer
//! - Gate invocation on handler kind vs. pending error
//! - Post the terminal handler once the registry is exhausted
//!
//! # Design Decisions
//! - All state lives in `DispatchState`, moved into every `Next`; a chain
//!   has exactly one owner at a time
//! - Skipping is a loop, so a long run of non-matching layers costs no stack
//! - The terminal is spawned, never called inline

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::handler::{Handler, HandlerError};
use crate::http::terminal::Terminal;
use crate::http::{Request, Response};
use crate::routing::layer::Layer;
use crate::routing::matcher::{MatchTarget, Matcher};

/// Position inside a layer's handler sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChainCursor {
    layer: usize,
    /// Next entry to run.
    entry: usize,
}

/// Per-request dispatch state.
#[derive(Debug)]
pub(crate) struct DispatchState {
    /// Next registry index to examine.
    cursor: usize,
    /// Set while a layer still has sequence entries left.
    chain: Option<ChainCursor>,
    error: Option<HandlerError>,
    /// Lower-cased request path, computed once.
    match_path: String,
}

impl DispatchState {
    pub(crate) fn new(path: &str) -> Self {
        Self {
            cursor: 0,
            chain: None,
            error: None,
            match_path: path.to_lowercase(),
        }
    }
}

/// The continuation handed to every handler.
///
/// Consuming it advances the chain: [`Next::run`] with no error,
/// [`Next::fail`] carrying one. Dropping it without calling either ends
/// dispatch for this request; the handler is then expected to have
/// finished the response.
#[must_use = "dispatch stops unless the continuation is run"]
pub struct Next {
    layers: Arc<[Layer]>,
    terminal: Arc<dyn Terminal>,
    state: DispatchState,
}

impl Next {
    pub(crate) fn new(
        layers: Arc<[Layer]>,
        terminal: Arc<dyn Terminal>,
        state: DispatchState,
    ) -> Self {
        Self {
            layers,
            terminal,
            state,
        }
    }

    /// Continue with no error pending.
    ///
    /// Called from a recovery handler this clears the error and resumes
    /// normal handlers.
    #[must_use = "futures do nothing unless awaited"]
    pub fn run(self, req: Request, res: Response) -> BoxFuture<'static, ()> {
        self.resume(None, req, res)
    }

    /// Continue carrying `err`. Later normal handlers are skipped until a
    /// matching recovery handler takes it.
    #[must_use = "futures do nothing unless awaited"]
    pub fn fail(
        self,
        err: impl Into<HandlerError>,
        req: Request,
        res: Response,
    ) -> BoxFuture<'static, ()> {
        self.resume(Some(err.into()), req, res)
    }

    /// Continue with the given error state, replacing the current one.
    #[must_use = "futures do nothing unless awaited"]
    pub fn resume(
        mut self,
        error: Option<HandlerError>,
        req: Request,
        res: Response,
    ) -> BoxFuture<'static, ()> {
        self.state.error = error;
        self.advance(req, res)
    }

    /// Drop the remaining entries of the current layer's sequence, so the
    /// next call continues with the following layer.
    pub fn outer(mut self) -> Self {
        self.state.chain = None;
        self
    }

    /// Index of the next registry layer that will be examined.
    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    fn advance(mut self, mut req: Request, res: Response) -> BoxFuture<'static, ()> {
        let layers = Arc::clone(&self.layers);

        loop {
            let (index, entry) = match self.state.chain.take() {
                Some(chain) if chain.entry < layers[chain.layer].handlers().len() => {
                    (chain.layer, chain.entry)
                }
                _ => {
                    let index = self.state.cursor;
                    let Some(layer) = layers.get(index) else {
                        return self.finish(req, res);
                    };
                    self.state.cursor += 1;

                    let target = MatchTarget {
                        path: &self.state.match_path,
                        method: req.method(),
                    };
                    if !layer.matches(&target) {
                        tracing::trace!(
                            layer = index,
                            route = %layer.route(),
                            "Layer skipped: no match"
                        );
                        continue;
                    }

                    req.set_route(layer.route_arc());
                    (index, 0)
                }
            };

            let chain = ChainCursor {
                layer: index,
                entry: entry + 1,
            };
            match (&layers[index].handlers()[entry], self.state.error.take()) {
                (Handler::Normal(handler), None) => {
                    tracing::trace!(layer = index, entry, route = %req.route(), "Invoking handler");
                    self.state.chain = Some(chain);
                    return handler.call(req, res, self);
                }
                (Handler::Recover(handler), Some(err)) => {
                    tracing::trace!(
                        layer = index,
                        entry,
                        route = %req.route(),
                        "Invoking recovery"
                    );
                    self.state.chain = Some(chain);
                    return handler.call(err, req, res, self);
                }
                (handler, error) => {
                    // Mismatch abandons the rest of the layer's sequence.
                    tracing::trace!(
                        layer = index,
                        entry,
                        kind = ?handler.kind(),
                        error_pending = error.is_some(),
                        "Handler skipped: kind does not fit error state"
                    );
                    self.state.error = error;
                }
            }
        }
    }

    fn finish(mut self, req: Request, res: Response) -> BoxFuture<'static, ()> {
        let error = self.state.error.take();
        tracing::debug!(
            path = %req.path(),
            error_pending = error.is_some(),
            "Registry exhausted, scheduling terminal"
        );

        let terminal = Arc::clone(&self.terminal);
        tokio::spawn(async move {
            terminal.finish(error, req, res).await;
        });
        futures_util::future::ready(()).boxed()
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("layers", &self.layers.len())
            .field("state", &self.state)
            .finish()
    }
}
