//! Route matching logic.
//!
//! # Responsibilities
//! - Split path templates into literal and parameter segments
//! - Match a request path against a template (segment by segment)
//! - Match a request query string against required key/value pairs
//!
//! # Design Decisions
//! - Pure functions, no state
//! - Segment counts must be equal (no trailing wildcards)
//! - Parameters are positional only; captured values are not bound
//! - Query constraints use subset semantics (extra keys are ignored)

use std::collections::HashMap;

/// Marker that turns a path segment into a named parameter (`/users/:id`).
pub const PARAM_MARKER: char = ':';

/// A single segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// Matches any non-empty request segment. Holds the name without the marker.
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(PARAM_MARKER) {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Literal(raw.to_string()),
        }
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Segment::Literal(lit) => lit == value,
            Segment::Param(_) => !value.is_empty(),
        }
    }
}

/// A parsed path template such as `/users/:id/orders/:orderId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template. Leading and trailing slashes are ignored.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: split_path(path).map(Segment::parse).collect(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if `raw_path` matches this template.
    pub fn matches(&self, raw_path: &str) -> bool {
        path_match(&self.segments, raw_path)
    }
}

/// True if `path` carries at least one parameter marker.
pub fn is_templated(path: &str) -> bool {
    path.contains(PARAM_MARKER)
}

fn split_path(path: &str) -> std::str::Split<'_, char> {
    path.trim_matches('/').split('/')
}

/// Match a request path against template segments.
///
/// `/` trims to the empty string, which still yields one (empty) segment.
pub fn path_match(template: &[Segment], raw_path: &str) -> bool {
    let request: Vec<&str> = split_path(raw_path).collect();
    if request.len() != template.len() {
        return false;
    }
    template
        .iter()
        .zip(request)
        .all(|(segment, value)| segment.matches(value))
}

/// Query parameters of a request, keeping the first value of every key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    /// Parse a raw (still percent-encoded) query string.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut values = HashMap::new();
        if let Some(raw) = raw {
            for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
                values
                    .entry(key.into_owned())
                    .or_insert_with(|| value.into_owned());
            }
        }
        Self { values }
    }

    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Subset match of required query pairs against the actual query.
///
/// An empty requirement matches anything.
pub fn query_match(required: &HashMap<String, String>, actual: &QueryParams) -> bool {
    required
        .iter()
        .all(|(key, value)| actual.get(key) == Some(value.as_str()))
}
