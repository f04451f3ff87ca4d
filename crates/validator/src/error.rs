//! Error types for rule failures and rule setup mistakes.
//!
//! Two classes of errors flow through the engine:
//!
//! - [`Failure`] is the expected outcome of a rule rejecting a value. It is
//!   collected into a [`ValidationError`] and later rendered by the
//!   translator.
//! - [`ConfigError`] signals a programming mistake in the rule setup (unknown
//!   factory, malformed declaration, bad limits). It aborts validation.
//!
//! Predicates return [`RuleError`], which carries either of the two.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// FAILURE
// ============================================================================

/// The signal a predicate raises when the value under validation is invalid.
///
/// Parameters are ordered key-value pairs (typically 0-2) used both to pick
/// and to fill message templates.
///
/// # Examples
///
/// ```
/// use tessera_validator::Failure;
///
/// let failure = Failure::new().with_param("min", "3");
/// assert_eq!(failure.param("min"), Some("3"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Failure {
    params: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl Failure {
    /// Creates a failure without parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Looks up a parameter value by key.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }

    pub fn params(&self) -> &[(Cow<'static, str>, Cow<'static, str>)] {
        &self.params
    }

    /// Consumes the failure into an ordered map; a repeated key keeps the
    /// last value.
    pub fn into_params(self) -> IndexMap<String, String> {
        self.params
            .into_iter()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("value rejected")?;
        if !self.params.is_empty() {
            write!(f, " (")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

/// A fatal mistake in the validation setup.
///
/// These are never collected or translated: they propagate out of
/// [`Validator::validate`](crate::Validator::validate) as soon as they occur.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A factory string names a rule that is not registered.
    #[error("no rule factory registered for '{name}'")]
    UnknownRule {
        /// The missing factory name.
        name: String,
    },

    /// A declaration the parser cannot read.
    #[error("invalid rule format - can't parse the rule declaration '{declaration}'")]
    InvalidDeclaration {
        /// Debug rendering of the offending declaration.
        declaration: String,
    },

    /// A rule factory rejected its parameters.
    #[error("invalid parameters for rule '{rule}': {reason}")]
    InvalidParameter { rule: String, reason: String },

    /// A rule was applied to a value it can never handle.
    #[error("rule '{rule}' cannot be applied here: {reason}")]
    UnsupportedValue { rule: String, reason: String },

    /// No built-in message bundle exists for the locale.
    #[error("no built-in templates for locale '{locale}'")]
    UnknownLocale { locale: String },
}

impl ConfigError {
    pub fn unknown_rule(name: impl Into<String>) -> Self {
        Self::UnknownRule { name: name.into() }
    }

    pub fn invalid_declaration(declaration: impl fmt::Debug) -> Self {
        Self::InvalidDeclaration {
            declaration: format!("{declaration:?}"),
        }
    }

    pub fn invalid_parameter(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_value(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedValue {
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// RULE ERROR
// ============================================================================

/// Error path of a predicate invocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The value is invalid; collected as a [`ValidationError`].
    #[error("{0}")]
    Failed(Failure),

    /// The rule itself is misconfigured or misapplied; aborts validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<Failure> for RuleError {
    fn from(failure: Failure) -> Self {
        Self::Failed(failure)
    }
}

/// Result type returned by predicates.
pub type RuleResult = Result<(), RuleError>;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// Durable record of one failed rule for one declared field path.
///
/// `field` is the declared path, wildcards included (`items.*.qty`), not the
/// concrete expanded location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub rule: String,
    #[serde(default)]
    pub params: IndexMap<String, String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            params: IndexMap::new(),
        }
    }

    /// Builds the record for a collected failure.
    pub fn from_failure(field: impl Into<String>, rule: impl Into<String>, failure: Failure) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            params: failure.into_params(),
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.rule)?;

        if !self.params.is_empty() {
            write!(f, " (params: [")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, "])")?;
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn failure_params_keep_order() {
        let failure = Failure::new()
            .with_param("min", "1")
            .with_param("max", "5");

        let keys: Vec<_> = failure.params().iter().map(|(k, _)| k.as_ref()).collect();
        assert_eq!(keys, ["min", "max"]);
        assert_eq!(failure.param("max"), Some("5"));
        assert_eq!(failure.param("other"), None);
    }

    #[test]
    fn repeated_param_keeps_last_value() {
        let params = Failure::new()
            .with_param("set", "a")
            .with_param("set", "b")
            .into_params();
        assert_eq!(params.get("set").map(String::as_str), Some("b"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn config_error_messages() {
        assert_eq!(
            ConfigError::unknown_rule("bogus").to_string(),
            "no rule factory registered for 'bogus'"
        );
        assert_eq!(
            ConfigError::invalid_parameter("min", "limit must be numeric").to_string(),
            "invalid parameters for rule 'min': limit must be numeric"
        );
    }

    #[test]
    fn rule_error_conversions() {
        let failed: RuleError = Failure::new().into();
        assert!(matches!(failed, RuleError::Failed(_)));

        let config: RuleError = ConfigError::unknown_rule("x").into();
        assert!(matches!(config, RuleError::Config(ConfigError::UnknownRule { .. })));
    }

    #[test]
    fn validation_error_display() {
        let error = ValidationError::new("items.*.qty", "min").with_param("min", "1");
        assert_eq!(error.to_string(), "[items.*.qty] min (params: [min=1])");
    }

    #[test]
    fn validation_error_serializes_params_as_map() {
        let error = ValidationError::new("age", "between")
            .with_param("min", "18")
            .with_param("max", "99");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "field": "age",
                "rule": "between",
                "params": {"min": "18", "max": "99"}
            })
        );
    }
}
