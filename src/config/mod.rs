//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → CLI overrides applied in main
//!     → HttpServer, logging, terminal, static routes
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::AppConfig;
pub use schema::DispatchConfig;
pub use schema::LimitsConfig;
pub use schema::ListenerConfig;
pub use schema::LoggingConfig;
pub use schema::StaticRouteConfig;
pub use schema::TimeoutConfig;
pub use validation::{validate_config, ValidationError};
