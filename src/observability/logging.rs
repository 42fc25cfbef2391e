//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Pick the filter: `RUST_LOG`, else `--verbose`, else configuration
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Human-readable `fmt` output; request correlation via the `dispatch` span

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

const VERBOSE_FILTER: &str = "copilot=debug,tower_http=debug";

/// Filter directives used when `RUST_LOG` is absent.
pub fn default_filter(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        VERBOSE_FILTER.to_string()
    } else {
        config.filter.clone()
    }
}

/// Install the global subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_logging(config: &LoggingConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config, verbose)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_selection() {
        let config = LoggingConfig {
            filter: "copilot=warn".into(),
        };
        assert_eq!(default_filter(&config, false), "copilot=warn");
        assert_eq!(default_filter(&config, true), VERBOSE_FILTER);
    }
}
