//! Size rules: `min`, `max` and `between`.
//!
//! The measured size depends on the value: numbers and numeric strings by
//! value, other strings by character count, arrays and objects by element
//! count. Booleans and files have no size.

use super::{ensure, single_param, two_params};
use crate::error::{ConfigError, Failure, RuleError, RuleResult};
use crate::rule::{Check, RuleContext};
use crate::value::{Value, parse_numeric};

/// A parsed numeric limit, keeping its source text for messages.
#[derive(Debug, Clone, PartialEq)]
struct Limit {
    value: f64,
    text: String,
}

impl Limit {
    fn parse(rule: &str, raw: &str) -> Result<Self, ConfigError> {
        let value = parse_numeric(raw).ok_or_else(|| {
            ConfigError::invalid_parameter(rule, format!("limit '{raw}' must be numeric"))
        })?;
        Ok(Self {
            value,
            text: raw.trim().to_owned(),
        })
    }
}

/// Measures `value` for the size rules; `None` for absent values.
fn measure(rule: &str, ctx: &RuleContext<'_>) -> Result<Option<f64>, RuleError> {
    if ctx.is_null() {
        return Ok(None);
    }

    let value = ctx.value_or_null();
    if let Some(n) = value.numeric() {
        return Ok(Some(n));
    }

    match value {
        Value::String(_) | Value::Array(_) | Value::Object(_) => {
            Ok(value.len().map(|len| len as f64))
        }
        other => Err(ConfigError::unsupported_value(
            rule,
            format!("a {} value has no size", other.type_name()),
        )
        .into()),
    }
}

// ============================================================================
// MIN / MAX
// ============================================================================

/// Size at least `min`.
#[derive(Debug, Clone, PartialEq)]
pub struct Min {
    limit: Limit,
}

impl Min {
    pub fn new(limit: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            limit: Limit::parse("min", limit)?,
        })
    }

    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Self::new(single_param("min", params)?)
    }
}

impl Check for Min {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let Some(size) = measure("min", ctx)? else {
            return Ok(());
        };
        ensure(size >= self.limit.value, || {
            Failure::new().with_param("min", self.limit.text.clone())
        })
    }
}

/// Size at most `max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Max {
    limit: Limit,
}

impl Max {
    pub fn new(limit: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            limit: Limit::parse("max", limit)?,
        })
    }

    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Self::new(single_param("max", params)?)
    }
}

impl Check for Max {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let Some(size) = measure("max", ctx)? else {
            return Ok(());
        };
        ensure(size <= self.limit.value, || {
            Failure::new().with_param("max", self.limit.text.clone())
        })
    }
}

// ============================================================================
// BETWEEN
// ============================================================================

/// Size within `min..=max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Between {
    min: Limit,
    max: Limit,
}

impl Between {
    pub fn new(min: &str, max: &str) -> Result<Self, ConfigError> {
        let min = Limit::parse("between", min)?;
        let max = Limit::parse("between", max)?;
        if min.value > max.value {
            return Err(ConfigError::invalid_parameter(
                "between",
                format!("minimum {} is greater than maximum {}", min.text, max.text),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        let (min, max) = two_params("between", params)?;
        Self::new(min, max)
    }
}

impl Check for Between {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let Some(size) = measure("between", ctx)? else {
            return Ok(());
        };
        ensure(
            (self.min.value..=self.max.value).contains(&size),
            || {
                Failure::new()
                    .with_param("min", self.min.text.clone())
                    .with_param("max", self.max.text.clone())
            },
        )
    }
}
