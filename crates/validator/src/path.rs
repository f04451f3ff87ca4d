//! Field paths and wildcard expansion.
//!
//! A field path is a dot-separated list of segments. The `*` segment matches
//! every child of the current scope; a trailing bare `*` targets the scope
//! itself as a collection.
//!
//! Expansion is a pure function of the path and the input: it never runs
//! rules, so it can be tested on its own.

use std::fmt;

use crate::value::Value;

/// The wildcard segment.
pub const WILDCARD: &str = "*";

/// Scope substituted for missing intermediate keys.
static EMPTY: Value = Value::Null;

// ============================================================================
// FIELD PATH
// ============================================================================

/// A parsed, immutable field path such as `addresses.*.zip`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = raw.split('.').map(str::to_owned).collect();
        Self { raw, segments }
    }

    /// The path as declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(|s| s == WILDCARD)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for FieldPath {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

// ============================================================================
// EXPANSION
// ============================================================================

/// One concrete place rules run: `key` looked up within `scope`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target<'a> {
    pub key: &'a str,
    pub scope: &'a Value,
}

/// Expands `path` against `scope` into every terminal it reaches.
///
/// Targets come out in wildcard iteration order (insertion order for
/// objects, index order for arrays). A wildcard over a scalar or an empty
/// collection yields nothing; a missing intermediate key continues into an
/// empty scope, so the terminal still produces a target.
///
/// # Examples
///
/// ```
/// use tessera_validator::path::{FieldPath, expand};
/// use tessera_validator::Value;
///
/// let input = Value::from(serde_json::json!({"a": [{"b": 1}, {"b": 2}]}));
/// let path = FieldPath::parse("a.*.b");
/// let targets = expand(&path, &input);
///
/// assert_eq!(targets.len(), 2);
/// assert!(targets.iter().all(|t| t.key == "b"));
/// ```
pub fn expand<'a>(path: &'a FieldPath, scope: &'a Value) -> Vec<Target<'a>> {
    let mut targets = Vec::new();
    expand_into(&path.segments, scope, &mut targets);
    targets
}

fn expand_into<'a>(segments: &'a [String], scope: &'a Value, out: &mut Vec<Target<'a>>) {
    let Some((current, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        out.push(Target {
            key: current,
            scope,
        });
    } else if current == WILDCARD {
        for nested in scope.children() {
            expand_into(rest, nested, out);
        }
    } else {
        let nested = scope.get(current).unwrap_or(&EMPTY);
        expand_into(rest, nested, out);
    }
}
