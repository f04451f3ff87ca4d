//! Outcome of a validation run.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::ValidationError;
use crate::translator::Translator;

/// Errors per declared field path, plus the translator that renders them.
///
/// Every declared field has an entry, empty when it passed. Messages are only
/// rendered when asked for.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    results: IndexMap<String, Vec<ValidationError>>,
    translator: Translator,
}

impl ValidationResult {
    pub fn new(results: IndexMap<String, Vec<ValidationError>>, translator: Translator) -> Self {
        Self {
            results,
            translator,
        }
    }

    /// True when no field collected an error.
    pub fn passed(&self) -> bool {
        self.results.values().all(Vec::is_empty)
    }

    pub fn failed(&self) -> bool {
        !self.passed()
    }

    /// Fields with at least one error, in declaration order.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &[ValidationError])> {
        self.results
            .iter()
            .filter(|(_, errors)| !errors.is_empty())
            .map(|(field, errors)| (field.as_str(), errors.as_slice()))
    }

    /// Errors of one declared field; empty for passing or undeclared fields.
    pub fn errors_for(&self, field: &str) -> &[ValidationError] {
        self.results.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn error_count(&self) -> usize {
        self.results.values().map(Vec::len).sum()
    }

    /// Every declared field, passing or not.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    /// Renders every error, in field declaration order, then rule order.
    pub fn messages(&self) -> Vec<String> {
        self.errors()
            .flat_map(|(field, errors)| self.translator.messages(field, errors))
            .collect()
    }

    /// Renders the messages of each failing field.
    pub fn messages_by_field(&self) -> IndexMap<String, Vec<String>> {
        self.errors()
            .map(|(field, errors)| (field.to_owned(), self.translator.messages(field, errors)))
            .collect()
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// JSON form of the failing fields: `{field: [error, ...]}`.
    pub fn to_json_value(&self) -> serde_json::Value {
        let errors: IndexMap<&str, &[ValidationError]> = self.errors().collect();
        serde_json::to_value(errors).unwrap_or(serde_json::Value::Null)
    }

    /// Converts a failed result into [`DataInvalid`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_validator::{Validator, Translator, Value, rules};
    ///
    /// let validator = Validator::builtin(rules([("name", "required")]), Translator::new());
    /// let err = validator.validate(&Value::from(serde_json::json!({})))
    ///     .unwrap()
    ///     .into_result()
    ///     .unwrap_err();
    ///
    /// assert_eq!(err.messages, ["The name does not pass the validation."]);
    /// ```
    pub fn into_result(self) -> Result<(), DataInvalid> {
        if self.passed() {
            return Ok(());
        }

        let messages = self.messages();
        let errors = self
            .results
            .into_iter()
            .filter(|(_, errors)| !errors.is_empty())
            .collect();

        Err(DataInvalid { messages, errors })
    }
}

/// Rejection of input data, as handed to a framework adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("The given data failed to pass the validator")]
pub struct DataInvalid {
    /// Rendered messages, in display order.
    pub messages: Vec<String>,
    /// Raw errors of the failing fields.
    pub errors: IndexMap<String, Vec<ValidationError>>,
}
