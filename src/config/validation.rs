//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0, statuses valid)
//! - Check static routes (method tokens, path shape)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderValue, StatusCode};
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::MethodFilter;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("routes[{index}].method {method:?} is not a valid method token")]
    RouteMethod { index: usize, method: String },

    #[error("routes[{index}].path {path:?} must start with '/'")]
    RoutePath { index: usize, path: String },

    #[error("routes[{index}].status {status} is not a valid HTTP status")]
    RouteStatus { index: usize, status: u16 },

    #[error("routes[{index}].content_type is not a valid header value")]
    RouteContentType { index: usize },
}

/// Check every semantic rule, collecting all failures.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    for (index, route) in config.routes.iter().enumerate() {
        if let Some(method) = &route.method {
            if method.parse::<MethodFilter>().is_err() {
                errors.push(ValidationError::RouteMethod {
                    index,
                    method: method.clone(),
                });
            }
        }
        if !route.path.starts_with('/') {
            errors.push(ValidationError::RoutePath {
                index,
                path: route.path.clone(),
            });
        }
        if StatusCode::from_u16(route.status).is_err() {
            errors.push(ValidationError::RouteStatus {
                index,
                status: route.status,
            });
        }
        if let Some(content_type) = &route.content_type {
            if HeaderValue::from_str(content_type).is_err() {
                errors.push(ValidationError::RouteContentType { index });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::StaticRouteConfig;

    fn route(method: Option<&str>, path: &str, status: u16) -> StaticRouteConfig {
        StaticRouteConfig {
            method: method.map(str::to_string),
            path: path.to_string(),
            status,
            body: String::new(),
            content_type: None,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.limits.max_body_bytes = 0;
        config.routes.push(route(Some("GE T"), "health", 1000));
        config.routes.push(route(Some("*"), "/ok", 204));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::BindAddress("not-an-address".into()),
                ValidationError::ZeroTimeout,
                ValidationError::ZeroBodyLimit,
                ValidationError::RouteMethod {
                    index: 0,
                    method: "GE T".into()
                },
                ValidationError::RoutePath {
                    index: 0,
                    path: "health".into()
                },
                ValidationError::RouteStatus {
                    index: 0,
                    status: 1000
                },
            ]
        );
    }
}
