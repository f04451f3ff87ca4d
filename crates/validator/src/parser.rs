//! Rule set parser and the rule factory table.
//!
//! Factory strings follow the grammar `name[:p1[,p2...]]`, several of them
//! joined with `|`. The name is separated from its parameters on the first
//! `:` only, so parameter values may themselves contain colons (regex
//! patterns, times). Rules whose single argument may contain commas
//! (`regex`, `dateformat`) receive that text unsplit.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use crate::collection::RulesCollection;
use crate::declaration::{EntryRule, RuleDeclaration};
use crate::error::ConfigError;
use crate::rule::{Check, Predicate, Rule};

/// Builds a predicate from the parameters of a factory string.
pub type RuleFactory = Arc<dyn Fn(&[String]) -> Result<Predicate, ConfigError> + Send + Sync>;

// ============================================================================
// FACTORY TABLE
// ============================================================================

/// Ordered table of rule factories, keyed by name.
///
/// The table is a value: [`with_factory`](Self::with_factory) and
/// [`merge`](Self::merge) return a new table and leave the original alone, so
/// one table can be shared by many validators.
#[derive(Clone, Default)]
pub struct RuleFactories {
    factories: IndexMap<String, FactoryEntry>,
}

#[derive(Clone)]
struct FactoryEntry {
    factory: RuleFactory,
    /// Receives everything after the first `:` as one parameter.
    unsplit: bool,
}

impl FactoryEntry {
    fn split(factory: RuleFactory) -> Self {
        Self {
            factory,
            unsplit: false,
        }
    }
}

impl RuleFactories {
    /// Creates an empty table; only predicate declarations can be parsed
    /// against it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding every built-in rule.
    pub fn builtin() -> Self {
        let mut factories = Self::new();
        crate::rules::register(&mut factories);
        factories
    }

    /// Returns a copy of the table with `name` bound to `factory`, replacing
    /// any factory already registered under that name.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_validator::{Failure, Predicate, RuleFactories};
    ///
    /// let factories = RuleFactories::new().with_factory("even", |_params| {
    ///     Ok(Predicate::from_fn(|ctx| match ctx.value().and_then(|v| v.as_f64()) {
    ///         Some(n) if n % 2.0 != 0.0 => Err(Failure::new().into()),
    ///         _ => Ok(()),
    ///     }))
    /// });
    /// assert!(factories.contains("even"));
    /// ```
    #[must_use = "with_factory returns a new table"]
    pub fn with_factory<F>(&self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&[String]) -> Result<Predicate, ConfigError> + Send + Sync + 'static,
    {
        let mut table = self.clone();
        table
            .factories
            .insert(name.into(), FactoryEntry::split(Arc::new(factory)));
        table
    }

    /// Returns a copy of the table extended with `other`; on a name clash the
    /// factory from `other` wins.
    #[must_use = "merge returns a new table"]
    pub fn merge(&self, other: &RuleFactories) -> Self {
        let mut table = self.clone();
        table.factories.extend(
            other
                .factories
                .iter()
                .map(|(name, entry)| (name.clone(), entry.clone())),
        );
        table
    }

    pub fn get(&self, name: &str) -> Option<&RuleFactory> {
        self.factories.get(name).map(|entry| &entry.factory)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registers a typed rule constructor.
    pub(crate) fn register<C, F>(&mut self, name: &str, build: F)
    where
        C: Check,
        F: Fn(&[String]) -> Result<C, ConfigError> + Send + Sync + 'static,
    {
        self.factories.insert(
            name.to_owned(),
            FactoryEntry::split(Arc::new(move |params: &[String]| {
                build(params).map(Predicate::new)
            })),
        );
    }

    /// Registers a typed rule constructor that takes the whole parameter
    /// text, commas and inner whitespace included, as its only parameter.
    pub(crate) fn register_unsplit<C, F>(&mut self, name: &str, build: F)
    where
        C: Check,
        F: Fn(&[String]) -> Result<C, ConfigError> + Send + Sync + 'static,
    {
        self.register(name, build);
        if let Some(entry) = self.factories.get_mut(name) {
            entry.unsplit = true;
        }
    }
}

impl fmt::Debug for RuleFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

// ============================================================================
// PARSER
// ============================================================================

/// Turns rule declarations into rule collections.
#[derive(Debug, Clone, Default)]
pub struct RulesParser {
    factories: RuleFactories,
}

impl RulesParser {
    pub fn new(factories: RuleFactories) -> Self {
        Self { factories }
    }

    pub fn factories(&self) -> &RuleFactories {
        &self.factories
    }

    /// Parses a declaration into its ordered rules.
    ///
    /// Naming follows the declaration shape: a single predicate is named
    /// `"0"`; a factory string is named after its factory; a list entry uses
    /// its explicit name when it is not numeric, else its factory name, else
    /// its index.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownRule`] when a factory name is not registered,
    /// [`ConfigError::InvalidDeclaration`] for an empty factory name, and any
    /// error a factory raises for its parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_validator::{RuleDeclaration, RuleFactories, RulesParser};
    ///
    /// let parser = RulesParser::new(RuleFactories::builtin());
    /// let rules = parser.parse(&RuleDeclaration::from("required|min:3|max:20")).unwrap();
    /// assert_eq!(rules.names().collect::<Vec<_>>(), ["required", "min", "max"]);
    /// ```
    pub fn parse(&self, declaration: &RuleDeclaration) -> Result<RulesCollection, ConfigError> {
        let mut rules = RulesCollection::new();

        match declaration {
            RuleDeclaration::Predicate(predicate) => {
                rules = rules.with_rule(Rule::new("0", predicate.clone()));
            }
            RuleDeclaration::Spec(specs) => {
                for spec in specs.split('|') {
                    rules = rules.with_rule(self.parse_spec(None, spec)?);
                }
            }
            RuleDeclaration::List(entries) => {
                for (index, entry) in entries.iter().enumerate() {
                    let name = entry.name.as_deref().filter(|name| !is_index(name));
                    let rule = match &entry.rule {
                        EntryRule::Spec(spec) => self.parse_spec(name, spec)?,
                        EntryRule::Predicate(predicate) => Rule::new(
                            name.map_or_else(|| index.to_string(), str::to_owned),
                            predicate.clone(),
                        ),
                    };
                    rules = rules.with_rule(rule);
                }
            }
        }

        Ok(rules)
    }

    /// Parses one factory string (no pipes) into a rule named `name`, or
    /// after its factory when `name` is `None`.
    pub fn parse_spec(&self, name: Option<&str>, spec: &str) -> Result<Rule, ConfigError> {
        let (factory_name, tail) = split_name(spec);

        if factory_name.is_empty() {
            return Err(ConfigError::invalid_declaration(spec));
        }

        let entry = self
            .factories
            .factories
            .get(factory_name)
            .ok_or_else(|| ConfigError::unknown_rule(factory_name))?;

        let params = match tail {
            Some(tail) if entry.unsplit => vec![tail.trim().to_owned()],
            Some(tail) => split_params(tail),
            None => Vec::new(),
        };

        trace!(rule = factory_name, ?params, "building rule");
        let predicate = (entry.factory)(&params)?;

        Ok(Rule::new(name.unwrap_or(factory_name), predicate))
    }
}

/// Splits `name:p1,p2` on the first colon, trimming the name and each
/// parameter.
///
/// # Examples
///
/// ```
/// use tessera_validator::parser::split_spec;
///
/// assert_eq!(split_spec(" regex : /^a:b$/ "), ("regex", vec!["/^a:b$/".to_owned()]));
/// assert_eq!(split_spec("required"), ("required", vec![]));
/// ```
pub fn split_spec(spec: &str) -> (&str, Vec<String>) {
    let (name, tail) = split_name(spec);
    (name, tail.map(split_params).unwrap_or_default())
}

fn split_name(spec: &str) -> (&str, Option<&str>) {
    match spec.split_once(':') {
        Some((name, tail)) => (name.trim(), Some(tail)),
        None => (spec.trim(), None),
    }
}

fn split_params(tail: &str) -> Vec<String> {
    tail.split(',').map(|p| p.trim().to_owned()).collect()
}

fn is_index(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}
