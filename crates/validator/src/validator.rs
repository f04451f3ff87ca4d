//! The validator: declared rules, a factory table and a translator.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, debug_span, trace, warn};

use crate::declaration::Rules;
use crate::error::ConfigError;
use crate::parser::{RuleFactories, RulesParser};
use crate::result::ValidationResult;
use crate::translator::Translator;
use crate::value::Value;

/// Validates input against a map of declared field rules.
///
/// A validator is immutable: every `with_*` method returns a new validator
/// sharing the rule declarations. `validate` holds no state between calls and
/// can run concurrently on one instance.
///
/// # Examples
///
/// ```
/// use tessera_validator::{Translator, Validator, Value, rules};
/// use serde_json::json;
///
/// let validator = Validator::builtin(
///     rules([("items.*.qty", "integer|min:1")]),
///     Translator::new().with_templates([("min", "The :attribute must be greater than :min.")]),
/// );
///
/// let input = Value::from(json!({"items": [{"qty": 0}, {"qty": 5}, {"qty": -1}]}));
/// let result = validator.validate(&input).unwrap();
///
/// assert!(result.failed());
/// assert_eq!(result.errors_for("items.*.qty").len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    rules: Arc<Rules>,
    parser: RulesParser,
    translator: Translator,
}

impl Validator {
    /// Creates a validator without rule factories: only predicate
    /// declarations can be used until [`with_factories`](Self::with_factories)
    /// supplies a table.
    pub fn new(rules: Rules, translator: Translator) -> Self {
        Self {
            rules: Arc::new(rules),
            parser: RulesParser::default(),
            translator,
        }
    }

    /// Creates a validator backed by the built-in rule factories.
    pub fn builtin(rules: Rules, translator: Translator) -> Self {
        Self::new(rules, translator).with_factories(RuleFactories::builtin())
    }

    #[must_use = "with_factories returns a new validator"]
    pub fn with_factories(&self, factories: RuleFactories) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
            parser: RulesParser::new(factories),
            translator: self.translator.clone(),
        }
    }

    /// Returns a validator whose translator has `labels` merged in.
    #[must_use = "with_labels returns a new validator"]
    pub fn with_labels<I, K, V>(&self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            rules: Arc::clone(&self.rules),
            parser: self.parser.clone(),
            translator: self.translator.with_labels(labels),
        }
    }

    /// Returns a validator whose translator has `templates` merged in.
    #[must_use = "with_templates returns a new validator"]
    pub fn with_templates<I, K, V>(&self, templates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            rules: Arc::clone(&self.rules),
            parser: self.parser.clone(),
            translator: self.translator.with_templates(templates),
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn factories(&self) -> &RuleFactories {
        self.parser.factories()
    }

    /// Validates `input` against every declared field, in declaration order.
    ///
    /// A failing field never stops the fields after it.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`]: an unknown factory, a malformed
    /// declaration, bad rule parameters or a rule applied where it cannot
    /// work. These are setup mistakes and are never collected.
    pub fn validate(&self, input: &Value) -> Result<ValidationResult, ConfigError> {
        let _span = debug_span!("validate", fields = self.rules.len()).entered();

        let mut results = IndexMap::with_capacity(self.rules.len());

        for (field, declaration) in self.rules.iter() {
            let errors = self
                .parser
                .parse(declaration)
                .and_then(|rules| rules.validate(field, input))
                .inspect_err(|err| warn!(field = %field, error = %err, "invalid rule setup"))?;

            trace!(field = %field, errors = errors.len(), "field validated");
            results.insert(field.clone(), errors);
        }

        let result = ValidationResult::new(results, self.translator.clone());
        debug!(
            passed = result.passed(),
            errors = result.error_count(),
            "validation finished"
        );

        Ok(result)
    }

    /// Validates a JSON document.
    pub fn validate_json(&self, input: &serde_json::Value) -> Result<ValidationResult, ConfigError> {
        self.validate(&Value::from(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{RuleDeclaration, rules};
    use crate::error::Failure;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn shared_parts_are_send_and_sync() {
        assert_send_sync::<Validator>();
        assert_send_sync::<Translator>();
        assert_send_sync::<RuleFactories>();
        assert_send_sync::<ValidationResult>();
    }

    #[test]
    fn one_validator_serves_many_threads() {
        let validator = Validator::builtin(rules([("n", "integer|min:1")]), Translator::new());

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|n| {
                    let validator = &validator;
                    scope.spawn(move || validator.validate_json(&json!({"n": n})).unwrap().passed())
                })
                .collect();
            let passed: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            assert_eq!(passed, [false, true, true, true]);
        });
    }

    #[test]
    fn empty_input_fails_required() {
        let validator = Validator::builtin(rules([("name", "required")]), Translator::new());
        let result = validator.validate(&Value::from(json!({}))).unwrap();

        assert!(result.failed());
        let errors = result.errors_for("name");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "required");
    }

    #[test]
    fn every_field_is_evaluated() {
        let validator = Validator::builtin(
            rules([("a", "required"), ("b", "required"), ("c", "required")]),
            Translator::new(),
        );
        let result = validator.validate_json(&json!({"b": "set"})).unwrap();

        let failing: Vec<_> = result.errors().map(|(field, _)| field).collect();
        assert_eq!(failing, ["a", "c"]);
        assert_eq!(result.fields().count(), 3);
    }

    #[test]
    fn predicates_work_without_factories() {
        let mut declared = Rules::new();
        declared.insert(
            "code".to_owned(),
            RuleDeclaration::predicate(|ctx| match ctx.value().and_then(Value::as_str) {
                Some("ok") => Ok(()),
                _ => Err(Failure::new().into()),
            }),
        );
        let validator = Validator::new(declared, Translator::new());

        assert!(validator.validate_json(&json!({"code": "ok"})).unwrap().passed());
        assert!(validator.validate_json(&json!({"code": "ko"})).unwrap().failed());
    }

    #[test]
    fn factory_strings_need_a_table() {
        let validator = Validator::new(rules([("name", "required")]), Translator::new());
        assert_eq!(
            validator.validate_json(&json!({})).unwrap_err(),
            ConfigError::unknown_rule("required")
        );
    }

    #[test]
    fn with_methods_leave_the_original_untouched() {
        let base = Validator::builtin(rules([("age", "min:18")]), Translator::new());
        let labelled = base
            .with_labels([("age", "Age")])
            .with_templates([("min", ":attribute must be at least :min")]);

        let input = json!({"age": 3});
        assert_eq!(
            labelled.validate_json(&input).unwrap().messages(),
            ["Age must be at least 18"]
        );
        assert_eq!(
            base.validate_json(&input).unwrap().messages(),
            ["The age does not pass the validation."]
        );
        assert_eq!(base.rules().len(), labelled.rules().len());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let validator = Validator::builtin(
            rules([("items.*.qty", "min:1"), ("name", "required|alpha")]),
            Translator::new(),
        );
        let input = Value::from(json!({"items": [{"qty": 0}, {"qty": 2}], "name": "4"}));

        let first = validator.validate(&input).unwrap();
        let second = validator.validate(&input).unwrap();
        assert_eq!(first.messages(), second.messages());
        assert_eq!(
            first.errors().collect::<Vec<_>>(),
            second.errors().collect::<Vec<_>>()
        );
    }
}
