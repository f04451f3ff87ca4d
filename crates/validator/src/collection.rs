//! Ordered rules of one field path, run across every target the path
//! expands to.

use crate::error::{ConfigError, RuleError, ValidationError};
use crate::path::{self, FieldPath};
use crate::rule::Rule;
use crate::value::Value;

/// The parsed rules of one field path, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RulesCollection {
    rules: Vec<Rule>,
}

impl RulesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collection with `rule` appended.
    #[must_use = "with_rule returns the extended collection"]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(Rule::name)
    }

    /// Runs every rule against every target `field` expands to in `input`.
    ///
    /// Failures are collected in wildcard iteration order, then rule order,
    /// each attributed to the declared `field` (wildcards included). Nothing
    /// short-circuits: a failed rule does not stop the rules after it.
    ///
    /// # Errors
    ///
    /// The first configuration error raised by a rule aborts the run.
    pub fn validate(&self, field: &str, input: &Value) -> Result<Vec<ValidationError>, ConfigError> {
        let path = FieldPath::parse(field);
        let mut errors = Vec::new();

        for target in path::expand(&path, input) {
            for rule in &self.rules {
                match rule.validate(target.key, target.scope, input) {
                    Ok(()) => {}
                    Err(RuleError::Failed(failure)) => {
                        errors.push(ValidationError::from_failure(field, rule.name(), failure));
                    }
                    Err(RuleError::Config(err)) => return Err(err),
                }
            }
        }

        Ok(errors)
    }
}
