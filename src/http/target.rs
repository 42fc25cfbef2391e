//! Request target normalization.
//!
//! Turns the raw request target into the decoded path and query mapping the
//! dispatcher matches on. Pure; a target that cannot be parsed yields path
//! `/` and an empty query rather than an error.

use std::collections::BTreeMap;

use serde::Serialize;
use url::{ParseError, Url};

const ORIGIN: &str = "http://localhost";

/// A single query value, or every value of a repeated key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// The first value.
    pub fn first(&self) -> &str {
        match self {
            QueryValue::Single(v) => v,
            QueryValue::Multi(vs) => vs.first().map(String::as_str).unwrap_or_default(),
        }
    }

    pub fn all(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(v) => vec![v.as_str()],
            QueryValue::Multi(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            QueryValue::Single(first) => {
                *self = QueryValue::Multi(vec![std::mem::take(first), value]);
            }
            QueryValue::Multi(vs) => vs.push(value),
        }
    }
}

/// Decoded query parameters keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Query(BTreeMap<String, QueryValue>);

impl Query {
    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(QueryValue::first)
    }

    pub fn get_value(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, key: String, value: String) {
        match self.0.get_mut(&key) {
            Some(existing) => existing.push(value),
            None => {
                self.0.insert(key, QueryValue::Single(value));
            }
        }
    }
}

/// Normalized request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: String,
    pub query: Query,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            query: Query::default(),
        }
    }
}

/// Normalize a raw request target (`/a/b?x=1`, or an absolute URL).
pub fn normalize(raw: &str) -> Target {
    if raw.is_empty() {
        return Target::default();
    }

    // Origin-form is resolved against the base verbatim so that a target
    // such as `//a` stays a path instead of becoming an authority.
    let parsed = if raw.starts_with('/') {
        Url::parse(&format!("{ORIGIN}{raw}"))
    } else {
        match Url::parse(raw) {
            Err(ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("{ORIGIN}/{raw}")),
            other => other,
        }
    };

    let url = match parsed {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(target_url = %raw, error = %e, "Unparseable request target");
            return Target::default();
        }
    };

    let path = decode_path(url.path());
    let path = if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    };

    let mut query = Query::default();
    for (key, value) in url.query_pairs() {
        query.insert(key.into_owned(), value.into_owned());
    }

    Target { path, query }
}

/// Percent-decode each segment. An encoded `/` stays `%2F` so it cannot
/// create a segment boundary the prefix matcher would honour.
fn decode_path(encoded: &str) -> String {
    encoded
        .split('/')
        .map(|segment| match urlencoding::decode(segment) {
            Ok(decoded) => decoded.replace('/', "%2F"),
            Err(_) => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
