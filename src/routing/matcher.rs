//! Layer matching logic.
//!
//! # Responsibilities
//! - Match the path prefix (case-insensitive) with a segment boundary check
//! - Match the method filter
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Both sides are lower-cased; the match key at registration, the path
//!   once per request
//! - A prefix only counts when followed by nothing, `/` or `.`, so `/hello`
//!   matches `/hello.json` and `/hello/world` but not `/helloworld`
//! - Empty prefix = always matches (wildcard)
//! - No regex to guarantee O(n) matching

use std::fmt;
use std::str::FromStr;

use axum::http::Method;
use thiserror::Error;

/// What a layer is matched against.
#[derive(Debug, Clone, Copy)]
pub struct MatchTarget<'a> {
    /// Lower-cased request path.
    pub path: &'a str,
    pub method: &'a Method,
}

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, target: &MatchTarget<'_>) -> bool;
}

/// Matches a lower-cased path prefix ending on a segment boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatcher {
    key: String,
}

impl PrefixMatcher {
    /// Build the matcher from a registered route.
    ///
    /// One trailing `/` is stripped and the rest lower-cased, so `/` and the
    /// empty route both match everything.
    pub fn new(route: &str) -> Self {
        let trimmed = route.strip_suffix('/').unwrap_or(route);
        Self {
            key: trimmed.to_lowercase(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Matcher for PrefixMatcher {
    fn matches(&self, target: &MatchTarget<'_>) -> bool {
        if !target.path.starts_with(&self.key) {
            return false;
        }
        matches!(
            target.path.as_bytes().get(self.key.len()),
            None | Some(b'/') | Some(b'.')
        )
    }
}

/// Method filter of a layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MethodFilter {
    #[default]
    Any,
    Only(Method),
}

/// Error returned when parsing a method filter.
#[derive(Debug, Clone, Error)]
#[error("Invalid HTTP method token: {0:?}")]
pub struct MethodFilterError(pub String);

impl FromStr for MethodFilter {
    type Err = MethodFilterError;

    /// `*` is the wildcard; anything else is upper-cased into a method token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "*" {
            return Ok(MethodFilter::Any);
        }
        Method::from_bytes(s.to_uppercase().as_bytes())
            .map(MethodFilter::Only)
            .map_err(|_| MethodFilterError(s.to_string()))
    }
}

/// Extension methods spelled in lower case are upper-cased like parsed tokens.
impl From<Method> for MethodFilter {
    fn from(method: Method) -> Self {
        let upper = method.as_str().to_uppercase();
        if upper == method.as_str() {
            return MethodFilter::Only(method);
        }
        match Method::from_bytes(upper.as_bytes()) {
            Ok(normalized) => MethodFilter::Only(normalized),
            Err(_) => MethodFilter::Only(method),
        }
    }
}

impl fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodFilter::Any => f.write_str("*"),
            MethodFilter::Only(method) => write!(f, "{method}"),
        }
    }
}

impl Matcher for MethodFilter {
    fn matches(&self, target: &MatchTarget<'_>) -> bool {
        match self {
            MethodFilter::Any => true,
            MethodFilter::Only(method) => method == target.method,
        }
    }
}
