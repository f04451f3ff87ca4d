//! Rule declarations: what a field is declared to satisfy.
//!
//! A declaration is one of:
//!
//! - a single predicate,
//! - a factory string, possibly pipe-delimited (`"required|min:3|max:20"`),
//! - an ordered list of predicates and factory strings, each optionally
//!   named.
//!
//! Declarations are plain data; [`RulesParser`](crate::RulesParser) turns
//! them into executable rules.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::error::RuleResult;
use crate::rule::{Predicate, RuleContext};

/// Declared rules, keyed by field path, in declaration order.
pub type Rules = IndexMap<String, RuleDeclaration>;

/// Builds a [`Rules`] map from `(field, declaration)` pairs.
///
/// # Examples
///
/// ```
/// use tessera_validator::rules;
///
/// let rules = rules([("name", "required"), ("age", "integer|min:18")]);
/// assert_eq!(rules.len(), 2);
/// ```
pub fn rules<K, D, I>(iter: I) -> Rules
where
    I: IntoIterator<Item = (K, D)>,
    K: Into<String>,
    D: Into<RuleDeclaration>,
{
    iter.into_iter()
        .map(|(field, declaration)| (field.into(), declaration.into()))
        .collect()
}

// ============================================================================
// DECLARATION
// ============================================================================

/// The rules declared for one field path.
#[derive(Debug, Clone)]
pub enum RuleDeclaration {
    /// A single anonymous predicate.
    Predicate(Predicate),
    /// A factory string, possibly pipe-delimited.
    Spec(String),
    /// An ordered list of entries.
    List(Vec<RuleEntry>),
}

impl RuleDeclaration {
    /// Starts an empty list declaration.
    pub fn list() -> RuleList {
        RuleList::default()
    }

    /// Declares a single closure predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> RuleResult + Send + Sync + 'static,
    {
        Self::Predicate(Predicate::from_fn(f))
    }
}

impl From<&str> for RuleDeclaration {
    fn from(spec: &str) -> Self {
        Self::Spec(spec.to_owned())
    }
}

impl From<String> for RuleDeclaration {
    fn from(spec: String) -> Self {
        Self::Spec(spec)
    }
}

impl From<Predicate> for RuleDeclaration {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

impl From<RuleList> for RuleDeclaration {
    fn from(list: RuleList) -> Self {
        Self::List(list.entries)
    }
}

/// One entry of a list declaration.
#[derive(Debug, Clone)]
pub struct RuleEntry {
    /// Explicit rule name; when absent the factory name or the list index is
    /// used.
    pub name: Option<String>,
    pub rule: EntryRule,
}

/// The rule part of a list entry.
///
/// A list entry is a single factory string: pipes are not split inside
/// lists.
#[derive(Clone)]
pub enum EntryRule {
    Predicate(Predicate),
    Spec(String),
}

impl fmt::Debug for EntryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(p) => fmt::Debug::fmt(p, f),
            Self::Spec(spec) => f.debug_tuple("Spec").field(spec).finish(),
        }
    }
}

// ============================================================================
// LIST BUILDER
// ============================================================================

/// Builder for list declarations.
///
/// # Examples
///
/// ```
/// use tessera_validator::{Failure, RuleDeclaration};
///
/// let declaration: RuleDeclaration = RuleDeclaration::list()
///     .spec("required")
///     .named_spec("adult", "min:18")
///     .named("even", |ctx| match ctx.value().and_then(|v| v.as_f64()) {
///         Some(n) if n % 2.0 != 0.0 => Err(Failure::new().into()),
///         _ => Ok(()),
///     })
///     .into();
/// ```
#[derive(Debug, Clone, Default)]
#[must_use = "builder methods must be chained or built"]
pub struct RuleList {
    entries: Vec<RuleEntry>,
}

impl RuleList {
    /// Appends an unnamed factory string, named after its factory.
    pub fn spec(mut self, spec: impl Into<String>) -> Self {
        self.entries.push(RuleEntry {
            name: None,
            rule: EntryRule::Spec(spec.into()),
        });
        self
    }

    /// Appends a factory string under an explicit name.
    pub fn named_spec(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
        self.entries.push(RuleEntry {
            name: Some(name.into()),
            rule: EntryRule::Spec(spec.into()),
        });
        self
    }

    /// Appends an unnamed predicate, named after its list index.
    pub fn predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> RuleResult + Send + Sync + 'static,
    {
        self.entries.push(RuleEntry {
            name: None,
            rule: EntryRule::Predicate(Predicate::from_fn(f)),
        });
        self
    }

    /// Appends a predicate under an explicit name.
    pub fn named<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> RuleResult + Send + Sync + 'static,
    {
        self.entries.push(RuleEntry {
            name: Some(name.into()),
            rule: EntryRule::Predicate(Predicate::from_fn(f)),
        });
        self
    }

    /// Appends an already built entry.
    pub fn entry(mut self, entry: RuleEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn build(self) -> RuleDeclaration {
        self.into()
    }
}

// ============================================================================
// SERDE
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDeclaration {
    Spec(String),
    List(Vec<String>),
    Named(IndexMap<String, String>),
}

/// Reads a declaration from its data form: a factory string, a list of
/// factory strings, or an ordered `{name: spec}` map. Predicates have no
/// data form.
impl<'de> Deserialize<'de> for RuleDeclaration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let declaration = match RawDeclaration::deserialize(deserializer)? {
            RawDeclaration::Spec(spec) => Self::Spec(spec),
            RawDeclaration::List(specs) => Self::List(
                specs
                    .into_iter()
                    .map(|spec| RuleEntry {
                        name: None,
                        rule: EntryRule::Spec(spec),
                    })
                    .collect(),
            ),
            RawDeclaration::Named(specs) => Self::List(
                specs
                    .into_iter()
                    .map(|(name, spec)| RuleEntry {
                        name: Some(name),
                        rule: EntryRule::Spec(spec),
                    })
                    .collect(),
            ),
        };
        Ok(declaration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry_names(declaration: &RuleDeclaration) -> Vec<Option<String>> {
        match declaration {
            RuleDeclaration::List(entries) => entries.iter().map(|e| e.name.clone()).collect(),
            other => panic!("expected a list, got {other:?}"),
        }
    }

    #[test]
    fn strings_convert_to_specs() {
        assert!(matches!(
            RuleDeclaration::from("required|min:3"),
            RuleDeclaration::Spec(s) if s == "required|min:3"
        ));
    }

    #[test]
    fn list_builder_keeps_order_and_names() {
        let declaration = RuleDeclaration::list()
            .spec("required")
            .named_spec("adult", "min:18")
            .predicate(|_| Ok(()))
            .build();

        assert_eq!(
            entry_names(&declaration),
            [None, Some("adult".to_owned()), None]
        );
    }

    #[test]
    fn deserializes_a_string() {
        let declaration: RuleDeclaration = serde_json::from_str(r#""required|email""#).unwrap();
        assert!(matches!(declaration, RuleDeclaration::Spec(s) if s == "required|email"));
    }

    #[test]
    fn deserializes_a_list_of_strings() {
        let declaration: RuleDeclaration =
            serde_json::from_str(r#"["required", "min:3"]"#).unwrap();
        assert_eq!(entry_names(&declaration), [None, None]);
    }

    #[test]
    fn deserializes_a_named_map_in_order() {
        let declaration: RuleDeclaration =
            serde_json::from_str(r#"{"zeta": "required", "alpha": "min:3"}"#).unwrap();
        assert_eq!(
            entry_names(&declaration),
            [Some("zeta".to_owned()), Some("alpha".to_owned())]
        );
    }

    #[test]
    fn rejects_non_string_items() {
        assert!(serde_json::from_str::<RuleDeclaration>("[1, 2]").is_err());
        assert!(serde_json::from_str::<RuleDeclaration>("42").is_err());
    }

    #[test]
    fn rules_map_keeps_declaration_order() {
        let rules = rules([("b", "required"), ("a", "email")]);
        let fields: Vec<_> = rules.keys().map(String::as_str).collect();
        assert_eq!(fields, ["b", "a"]);
    }
}
