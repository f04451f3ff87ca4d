//! Whole-collection rules, declared on a bare wildcard such as `items.*`.

use super::{ensure, single_param};
use crate::error::{ConfigError, Failure, RuleResult};
use crate::rule::{Check, RuleContext};
use crate::value::Value;

/// Values of `field` across the elements of the collection that carry it.
fn field_values<'a>(
    rule: &str,
    ctx: &RuleContext<'a>,
    field: &'a str,
) -> Result<impl Iterator<Item = &'a Value>, ConfigError> {
    if !ctx.is_collection() {
        return Err(ConfigError::unsupported_value(
            rule,
            format!("'{}' is not a collection target, declare the rule on `*`", ctx.key()),
        ));
    }
    Ok(ctx.scope().children().filter_map(move |item| item.get(field)))
}

/// Every element carries a distinct `field` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaveDifferent {
    field: String,
}

impl HaveDifferent {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Ok(Self::new(single_param("havedifferent", params)?))
    }
}

impl Check for HaveDifferent {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let mut seen: Vec<&Value> = Vec::new();
        let mut distinct = true;
        for value in field_values("havedifferent", ctx, &self.field)? {
            if seen.contains(&value) {
                distinct = false;
                break;
            }
            seen.push(value);
        }
        ensure(distinct, || {
            Failure::new().with_param("field", self.field.clone())
        })
    }
}

/// Every element carries the same `field` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaveSame {
    field: String,
}

impl HaveSame {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Ok(Self::new(single_param("havesame", params)?))
    }
}

impl Check for HaveSame {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let mut values = field_values("havesame", ctx, &self.field)?;
        let same = match values.next() {
            Some(first) => values.all(|value| value == first),
            None => true,
        };
        ensure(same, || {
            Failure::new().with_param("field", self.field.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::rules::testing::{misapplied, run};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn collection(value: serde_json::Value) -> Value {
        Value::from(value)
    }

    #[test]
    fn havedifferent_spots_duplicates() {
        let rule = HaveDifferent::new("email");
        let unique = collection(json!([{"email": "a@x.io"}, {"email": "b@x.io"}, {}]));
        let repeated = collection(json!([{"email": "a@x.io"}, {"name": "b"}, {"email": "a@x.io"}]));

        assert!(run(&rule, "*", &unique).is_ok());
        assert!(matches!(run(&rule, "*", &repeated), Err(RuleError::Failed(_))));
    }

    #[test]
    fn havesame_compares_present_fields() {
        let rule = HaveSame::new("currency");
        let same = collection(json!({
            "a": {"currency": "EUR"},
            "b": {"amount": 3},
            "c": {"currency": "EUR"},
        }));
        let mixed = collection(json!([{"currency": "EUR"}, {"currency": "USD"}]));

        assert!(run(&rule, "*", &same).is_ok());
        assert!(run(&rule, "*", &collection(json!([]))).is_ok());

        let Err(RuleError::Failed(failure)) = run(&rule, "*", &mixed) else {
            panic!("expected a failure");
        };
        assert_eq!(failure.param("field"), Some("currency"));
    }

    #[test]
    fn comparison_is_strict() {
        let rule = HaveSame::new("n");
        let input = collection(json!([{"n": 1}, {"n": "1"}]));
        assert!(run(&rule, "*", &input).is_err());
    }

    #[test]
    fn collection_rules_need_a_wildcard_target() {
        assert!(misapplied(&HaveSame::new("id"), json!([{"id": 1}])));
        assert!(misapplied(&HaveDifferent::new("id"), json!([{"id": 1}])));
        assert!(HaveSame::from_params(&[]).is_err());
    }
}
