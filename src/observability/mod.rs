//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields)
//!     → `dispatch` span per request (method, url, request id)
//!
//! Consumers:
//!     → logging.rs installs the subscriber (stdout)
//!     → tower-http TraceLayer adds HTTP request/response spans
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the host layer into every dispatch log line
//! - Per-layer decisions are logged at `trace` so they cost nothing by default

pub mod logging;

pub use logging::init_logging;
