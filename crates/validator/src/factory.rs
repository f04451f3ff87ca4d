//! Application-level wiring: one place holding the factory table and the
//! default translator, handing out validators for rule maps.

use crate::declaration::Rules;
use crate::error::{ConfigError, RuleResult};
use crate::locale;
use crate::parser::RuleFactories;
use crate::rule::{Predicate, RuleContext};
use crate::translator::Translator;
use crate::validator::Validator;

/// Builds validators sharing one factory table and one default translator.
///
/// Typically created once at startup and reused for every request.
///
/// # Examples
///
/// ```
/// use tessera_validator::{ValidatorFactory, Value, rules};
/// use serde_json::json;
///
/// let factory = ValidatorFactory::create("en").unwrap();
/// let validator = factory.validator(rules([("email", "required|email")]));
///
/// let result = validator.validate(&Value::from(json!({"email": "nope"}))).unwrap();
/// assert_eq!(result.messages(), ["The email must be an email."]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidatorFactory {
    factories: RuleFactories,
    translator: Translator,
}

impl ValidatorFactory {
    /// Creates a factory with `translator` and no rule factories.
    pub fn new(translator: Translator) -> Self {
        Self {
            factories: RuleFactories::new(),
            translator,
        }
    }

    /// Creates a factory with every built-in rule and the built-in templates
    /// of `locale`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownLocale`] when no bundle exists for `locale`.
    pub fn create(locale: &str) -> Result<Self, ConfigError> {
        let templates = locale::templates(locale).ok_or_else(|| ConfigError::UnknownLocale {
            locale: locale.to_owned(),
        })?;

        Ok(Self {
            factories: RuleFactories::builtin(),
            translator: Translator::new().with_templates(templates.iter().copied()),
        })
    }

    /// Returns a factory with an extra rule factory.
    #[must_use = "with_rule_factory returns a new factory"]
    pub fn with_rule_factory<F>(&self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&[String]) -> Result<Predicate, ConfigError> + Send + Sync + 'static,
    {
        Self {
            factories: self.factories.with_factory(name, factory),
            translator: self.translator.clone(),
        }
    }

    /// Returns a factory with an extra parameterless rule.
    #[must_use = "with_rule returns a new factory"]
    pub fn with_rule<F>(&self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> RuleResult + Send + Sync + 'static,
    {
        let predicate = Predicate::from_fn(check);
        self.with_rule_factory(name, move |_| Ok(predicate.clone()))
    }

    /// Returns a factory whose validators start with `labels`.
    #[must_use = "with_default_labels returns a new factory"]
    pub fn with_default_labels<I, K, V>(&self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            factories: self.factories.clone(),
            translator: self.translator.with_labels(labels),
        }
    }

    /// Returns a factory whose validators start with `templates`.
    #[must_use = "with_default_templates returns a new factory"]
    pub fn with_default_templates<I, K, V>(&self, templates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            factories: self.factories.clone(),
            translator: self.translator.with_templates(templates),
        }
    }

    pub fn factories(&self) -> &RuleFactories {
        &self.factories
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Creates a validator for `rules`.
    pub fn validator(&self, rules: Rules) -> Validator {
        Validator::new(rules, self.translator.clone()).with_factories(self.factories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::rules;
    use crate::error::Failure;
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn create_rejects_unknown_locales() {
        assert_eq!(
            ValidatorFactory::create("xx").unwrap_err(),
            ConfigError::UnknownLocale {
                locale: "xx".to_owned()
            }
        );
    }

    #[test]
    fn create_wires_builtins_and_templates() {
        let factory = ValidatorFactory::create("en").unwrap();
        assert!(factory.factories().contains("between"));
        assert_eq!(
            factory.translator().template("required"),
            Some("The :attribute is required.")
        );
    }

    #[test]
    fn default_labels_and_templates_reach_validators() {
        let factory = ValidatorFactory::create("en")
            .unwrap()
            .with_default_labels([("name", "Name")])
            .with_default_templates([("required", ":attribute is mandatory")]);
        let validator = factory.validator(rules([("name", "required")]));

        let result = validator.validate(&Value::from(json!({}))).unwrap();
        assert_eq!(result.messages(), ["Name is mandatory"]);
    }

    #[test]
    fn custom_rules_extend_a_copy() {
        let base = ValidatorFactory::create("en").unwrap();
        let extended = base.with_rule("uppercase", |ctx| {
            match ctx.value().and_then(Value::as_str) {
                Some(s) if s.chars().any(char::is_lowercase) => Err(Failure::new().into()),
                _ => Ok(()),
            }
        });

        assert!(!base.factories().contains("uppercase"));

        let validator = extended
            .with_default_templates([("uppercase", "The :attribute must be uppercase.")])
            .validator(rules([("code", "required|uppercase")]));
        let result = validator.validate(&Value::from(json!({"code": "abC"}))).unwrap();
        assert_eq!(result.messages(), ["The code must be uppercase."]);
    }

    #[test]
    fn parameterised_custom_factory() {
        let factory = ValidatorFactory::create("en")
            .unwrap()
            .with_rule_factory("startswith", |params| {
                let prefix = params.first().cloned().unwrap_or_default();
                Ok(Predicate::from_fn(move |ctx| {
                    match ctx.value().and_then(Value::as_str) {
                        Some(s) if !s.starts_with(&prefix) => {
                            Err(Failure::new().with_param("prefix", prefix.clone()).into())
                        }
                        _ => Ok(()),
                    }
                }))
            })
            .with_default_templates([("startswith", "The :attribute must start with :prefix.")]);

        let validator = factory.validator(rules([("sku", "startswith:AB-")]));
        let result = validator.validate(&Value::from(json!({"sku": "XY-1"}))).unwrap();
        assert_eq!(result.messages(), ["The sku must start with AB-."]);
    }
}
