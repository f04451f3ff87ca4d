//! Rule units: a named predicate bound into one field's evaluation.

use std::fmt;
use std::sync::Arc;

use crate::error::RuleResult;
use crate::path::WILDCARD;
use crate::value::Value;

static MISSING: Value = Value::Null;

// ============================================================================
// CONTEXT
// ============================================================================

/// Everything a predicate sees for one invocation.
///
/// For a regular terminal `value` is `scope[key]` (`None` when the key is
/// absent). For a bare `*` terminal the key is `"*"` and `value` is the whole
/// scope, so collection-level rules can inspect every element.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    key: &'a str,
    value: Option<&'a Value>,
    scope: &'a Value,
    input: &'a Value,
}

impl<'a> RuleContext<'a> {
    pub fn new(key: &'a str, value: Option<&'a Value>, scope: &'a Value, input: &'a Value) -> Self {
        Self {
            key,
            value,
            scope,
            input,
        }
    }

    /// The key being validated within the scope.
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// The value under validation, `None` when the key is absent.
    pub fn value(&self) -> Option<&'a Value> {
        self.value
    }

    /// The value under validation with absence read as `null`.
    pub fn value_or_null(&self) -> &'a Value {
        self.value.unwrap_or(&MISSING)
    }

    /// True when the value is absent or explicitly `null`.
    ///
    /// Most rules pass in that case and leave absence to `required`.
    pub fn is_null(&self) -> bool {
        self.value.is_none_or(Value::is_null)
    }

    /// True when the key is absent from the scope, as opposed to `null`.
    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }

    /// The map or array the key is looked up in.
    pub fn scope(&self) -> &'a Value {
        self.scope
    }

    /// The whole input, for cross-field comparisons.
    pub fn input(&self) -> &'a Value {
        self.input
    }

    /// True for a bare `*` terminal validating the scope as a collection.
    pub fn is_collection(&self) -> bool {
        self.key == WILDCARD
    }

    /// Looks up another key of the same scope.
    pub fn sibling(&self, key: &str) -> Option<&'a Value> {
        self.scope.get(key)
    }
}

// ============================================================================
// PREDICATE
// ============================================================================

/// A validation check.
///
/// Implemented by the built-in rule types and, through the blanket impl, by
/// any `Fn(&RuleContext) -> RuleResult` closure.
pub trait Check: Send + Sync + 'static {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult;
}

impl<F> Check for F
where
    F: Fn(&RuleContext<'_>) -> RuleResult + Send + Sync + 'static,
{
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        self(ctx)
    }
}

/// A shareable, type-erased [`Check`].
#[derive(Clone)]
pub struct Predicate(Arc<dyn Check>);

impl Predicate {
    pub fn new(check: impl Check) -> Self {
        Self(Arc::new(check))
    }

    /// Wraps a closure; unlike [`Predicate::new`] this pins the closure
    /// signature, so `|ctx| ...` needs no annotations.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> RuleResult + Send + Sync + 'static,
    {
        Self::new(f)
    }

    pub fn call(&self, ctx: &RuleContext<'_>) -> RuleResult {
        self.0.check(ctx)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(<function>)")
    }
}

// ============================================================================
// RULE
// ============================================================================

/// A named predicate.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    predicate: Predicate,
}

impl Rule {
    pub fn new(name: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Runs the predicate for `key` within `scope`.
    pub fn validate(&self, key: &str, scope: &Value, input: &Value) -> RuleResult {
        let value = if key == WILDCARD {
            Some(scope)
        } else {
            scope.get(key)
        };

        self.predicate
            .call(&RuleContext::new(key, value, scope, input))
    }
}
