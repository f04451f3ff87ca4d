//! Rendering validation errors into messages.
//!
//! A template is picked for each error in priority order:
//!
//! 1. `"{field}.{rule}"`
//! 2. `"{field}"` (one message for the whole field)
//! 3. `"{rule}"`
//! 4. [`DEFAULT_TEMPLATE_KEY`]
//! 5. [`FALLBACK_TEMPLATE`]
//!
//! Templates contain `:name` placeholders. `:attribute` is the field label
//! (or the field path itself); every error parameter is available under its
//! own name, with label lookup applied to its value.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ValidationError;

/// Template key consulted when neither the field nor the rule has one.
pub const DEFAULT_TEMPLATE_KEY: &str = "default";

/// Template used when no template matches at all.
pub const FALLBACK_TEMPLATE: &str = "The :attribute does not pass the validation.";

const ATTRIBUTE: &str = "attribute";

// ============================================================================
// CONFIG
// ============================================================================

/// Serializable labels and templates, e.g. a locale bundle loaded from JSON.
///
/// # Examples
///
/// ```
/// use tessera_validator::{Translator, TranslatorConfig};
///
/// let config: TranslatorConfig = serde_json::from_str(r#"{
///     "labels": {"age": "Age"},
///     "templates": {"min": ":attribute must be at least :min"}
/// }"#).unwrap();
///
/// let translator = Translator::from_config(config);
/// assert_eq!(translator.label("age"), "Age");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub labels: IndexMap<String, String>,
    pub templates: IndexMap<String, String>,
}

// ============================================================================
// TRANSLATOR
// ============================================================================

/// Renders validation errors with labels and templates.
///
/// Cloning is cheap; `with_labels` and `with_templates` return a new
/// translator and leave the original untouched.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    labels: Arc<HashMap<String, String>>,
    templates: Arc<HashMap<String, String>>,
}

impl Translator {
    /// Creates a translator without labels or templates; every error renders
    /// with [`FALLBACK_TEMPLATE`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: TranslatorConfig) -> Self {
        Self::new()
            .with_labels(config.labels)
            .with_templates(config.templates)
    }

    /// Returns a translator with `labels` merged over the current ones.
    #[must_use = "with_labels returns a new translator"]
    pub fn with_labels<I, K, V>(&self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut translator = self.clone();
        Arc::make_mut(&mut translator.labels)
            .extend(labels.into_iter().map(|(k, v)| (k.into(), v.into())));
        translator
    }

    /// Returns a translator with `templates` merged over the current ones.
    #[must_use = "with_templates returns a new translator"]
    pub fn with_templates<I, K, V>(&self, templates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut translator = self.clone();
        Arc::make_mut(&mut translator.templates)
            .extend(templates.into_iter().map(|(k, v)| (k.into(), v.into())));
        translator
    }

    /// Returns the label for `key`, or `key` itself.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.labels.get(key).map_or(key, String::as_str)
    }

    /// Returns the registered template for `key`, if any.
    pub fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    /// Picks the template for one failed `rule` of `field`.
    pub fn template_for(&self, field: &str, rule: &str) -> &str {
        self.template(&format!("{field}.{rule}"))
            .or_else(|| self.template(field))
            .or_else(|| self.template(rule))
            .or_else(|| self.template(DEFAULT_TEMPLATE_KEY))
            .unwrap_or(FALLBACK_TEMPLATE)
    }

    /// Renders one error.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_validator::{Translator, ValidationError};
    ///
    /// let translator = Translator::new()
    ///     .with_labels([("age", "Age")])
    ///     .with_templates([("min", ":attribute must be at least :min")]);
    ///
    /// let error = ValidationError::new("age", "min").with_param("min", "18");
    /// assert_eq!(translator.translate(&error), "Age must be at least 18");
    /// ```
    pub fn translate(&self, error: &ValidationError) -> String {
        let template = self.template_for(&error.field, &error.rule);
        self.render(template, &error.field, &error.params)
    }

    /// Renders the errors of one field.
    ///
    /// A field-level template collapses the field to a single message,
    /// rendered with the parameters of the first error; otherwise every error
    /// gets its own message.
    pub fn messages(&self, field: &str, errors: &[ValidationError]) -> Vec<String> {
        let Some(first) = errors.first() else {
            return Vec::new();
        };

        match self.template(field) {
            Some(template) => vec![self.render(template, field, &first.params)],
            None => errors.iter().map(|error| self.translate(error)).collect(),
        }
    }

    /// Substitutes placeholders in `template` in a single left-to-right
    /// pass. At each `:` the longest known placeholder name wins; unknown
    /// tokens are kept verbatim and substituted text is never rescanned.
    pub fn render(&self, template: &str, field: &str, params: &IndexMap<String, String>) -> String {
        trace!(field, template, "rendering message");

        let mut placeholders: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        placeholders.push((ATTRIBUTE, self.label(field)));
        for (name, value) in params {
            if name != ATTRIBUTE {
                placeholders.push((name.as_str(), self.label(value)));
            }
        }
        // Longest names first so the first match is the longest one.
        placeholders.sort_by_key(|(name, _)| Reverse(name.len()));

        substitute(template, &placeholders)
    }
}

fn substitute(template: &str, placeholders: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(':') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        match placeholders
            .iter()
            .find(|(name, _)| !name.is_empty() && after.starts_with(name))
        {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len()..];
            }
            None => {
                out.push(':');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
