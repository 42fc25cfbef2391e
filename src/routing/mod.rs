//! Routing subsystem: the layer registry and the dispatch loop.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     Mount (handler, route?, method?, more entries?)
//!     → router.rs (RouterBuilder::mount appends a Layer)
//!     → build(): freeze as immutable Router
//!
//! Incoming Request (method, target)
//!     → router.rs (normalize target, create DispatchState)
//!     → dispatch.rs (Next: walk layers from the cursor)
//!     → matcher.rs (prefix + boundary + method)
//!     → handler invoke, which may call next again
//!     → registry exhausted: terminal posted on its own task
//! ```
//!
//! # Design Decisions
//! - Layers registered at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always walks the same layers
//! - Registration order is match priority

pub mod dispatch;
pub mod fixed;
pub mod layer;
pub mod matcher;
pub mod router;

pub use dispatch::Next;
pub use fixed::{static_route, FixedResponse};
pub use layer::{Layer, Mount};
pub use matcher::{MatchTarget, Matcher, MethodFilter, MethodFilterError, PrefixMatcher};
pub use router::{Router, RouterBuilder};
