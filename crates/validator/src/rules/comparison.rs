//! Comparison rules: against sibling fields, fixed sets and acceptance words.

use super::{ensure, ensure_plain, non_empty_params, single_param};
use crate::error::{ConfigError, Failure, RuleResult};
use crate::rule::{Check, RuleContext};
use crate::value::Value;

/// Reads the sibling `other`, absence counting as `null`.
fn other_value<'a>(ctx: &RuleContext<'a>, other: &str) -> &'a Value {
    static NULL: Value = Value::Null;
    ctx.sibling(other).unwrap_or(&NULL)
}

// ============================================================================
// SIBLINGS
// ============================================================================

/// Strictly equal to the sibling `other`.
///
/// Runs on absent values too: two absent fields are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equals {
    other: String,
}

impl Equals {
    pub fn new(other: impl Into<String>) -> Self {
        Self {
            other: other.into(),
        }
    }

    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Ok(Self::new(single_param("equals", params)?))
    }
}

impl Check for Equals {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        ensure(ctx.value_or_null() == other_value(ctx, &self.other), || {
            Failure::new().with_param("other", self.other.clone())
        })
    }
}

/// Different from the sibling `other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Different {
    other: String,
}

impl Different {
    pub fn new(other: impl Into<String>) -> Self {
        Self {
            other: other.into(),
        }
    }

    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Ok(Self::new(single_param("different", params)?))
    }
}

impl Check for Different {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        if ctx.is_null() {
            return Ok(());
        }
        ensure(ctx.value_or_null() != other_value(ctx, &self.other), || {
            Failure::new().with_param("other", self.other.clone())
        })
    }
}

// ============================================================================
// SETS
// ============================================================================

/// A set of allowed or forbidden values, compared by textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ValueSet {
    members: Vec<String>,
}

impl ValueSet {
    fn contains(&self, value: &Value) -> bool {
        value
            .as_text()
            .is_some_and(|text| self.members.iter().any(|member| *member == text))
    }

    fn failure(&self) -> Failure {
        Failure::new().with_param("set", self.members.join(", "))
    }
}

/// One of the listed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct In {
    set: ValueSet,
}

impl In {
    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            set: ValueSet {
                members: non_empty_params("in", params)?,
            },
        })
    }
}

impl Check for In {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        if ctx.is_null() {
            return Ok(());
        }
        ensure(self.set.contains(ctx.value_or_null()), || self.set.failure())
    }
}

/// None of the listed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotIn {
    set: ValueSet,
}

impl NotIn {
    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            set: ValueSet {
                members: non_empty_params("notin", params)?,
            },
        })
    }
}

impl Check for NotIn {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        if ctx.is_null() {
            return Ok(());
        }
        ensure(!self.set.contains(ctx.value_or_null()), || self.set.failure())
    }
}

// ============================================================================
// ACCEPTANCE
// ============================================================================

fn is_accepted(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => matches!(s.as_str(), "yes" | "on" | "1"),
        _ => false,
    }
}

/// `true`, `1`, `"1"`, `"yes"` or `"on"`, as sent by checkboxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accepted;

impl Check for Accepted {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        if ctx.is_null() {
            return Ok(());
        }
        ensure_plain(is_accepted(ctx.value_or_null()))
    }
}

/// Anything but an [`Accepted`] value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotAccepted;

impl Check for NotAccepted {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        if ctx.is_null() {
            return Ok(());
        }
        ensure_plain(!is_accepted(ctx.value_or_null()))
    }
}
