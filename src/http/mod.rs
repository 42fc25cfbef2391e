//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, timeout, body buffering)
//!     → request.rs (dispatcher request context)
//!     → target.rs (decoded path + query)
//!     → [routing layer walks the handler chain]
//!     → response.rs (handlers write, finished response goes back to Axum)
//!     → terminal.rs (404 / error reply once no layer is left)
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod target;
pub mod terminal;

pub use request::{Request, X_REQUEST_ID};
pub use response::{Response, ResponseError, ResponseReceiver};
pub use server::{AppState, HttpServer};
pub use target::{normalize, Query, QueryValue, Target};
pub use terminal::{DefaultTerminal, Terminal};
