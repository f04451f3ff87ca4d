//! Type rules.

use super::ensure_plain;
use crate::error::RuleResult;
use crate::rule::{Check, RuleContext};
use crate::value::Value;

/// Arrays and objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Array;

impl Check for Array {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        if ctx.is_null() {
            return Ok(());
        }
        ensure_plain(ctx.value_or_null().is_container())
    }
}

/// Booleans only; `"true"` or `1` are not booleans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boolean;

impl Check for Boolean {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        if ctx.is_null() {
            return Ok(());
        }
        ensure_plain(ctx.value_or_null().as_bool().is_some())
    }
}

/// Numbers and numeric strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Numeric;

impl Check for Numeric {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        if ctx.is_null() {
            return Ok(());
        }
        ensure_plain(ctx.value_or_null().numeric().is_some())
    }
}

/// Integral numbers and integer strings (`"42"`, `"-7"`, `"+3"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Integer;

impl Check for Integer {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        if ctx.is_null() {
            return Ok(());
        }
        ensure_plain(is_integer(ctx.value_or_null()))
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        Value::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}
