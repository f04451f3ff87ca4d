//! # tessera-validator
//!
//! Declarative validation for nested request data.
//!
//! Rules are declared per field path as factory strings (`"required|min:3"`),
//! closures, or lists of both. Paths may contain `*` segments that fan out
//! over arrays and objects. Failures are collected as structured
//! [`ValidationError`]s and rendered into messages by a [`Translator`], so the
//! same result can be presented in any wording without validating again.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use tessera_validator::{ValidatorFactory, Value, rules};
//!
//! let validator = ValidatorFactory::create("en")?.validator(rules([
//!     ("name", "required|alpha"),
//!     ("items.*.qty", "required|integer|min:1"),
//! ]));
//!
//! let input = Value::from(json!({
//!     "name": "Widget",
//!     "items": [{"qty": 0}, {"qty": 3}],
//! }));
//!
//! let result = validator.validate(&input)?;
//! assert!(result.failed());
//! assert_eq!(result.messages(), ["The items.*.qty must be greater than 1."]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Pipeline
//!
//! - [`RulesParser`] turns each [`RuleDeclaration`] into a [`RulesCollection`]
//!   using a table of [`RuleFactories`].
//! - [`path::expand`] resolves a [`FieldPath`] to every concrete key it names.
//! - Each [`Rule`] runs against each key; a [`Failure`] becomes a
//!   [`ValidationError`], a [`ConfigError`] aborts the whole call.
//! - [`ValidationResult`] keeps errors per field and renders them through the
//!   [`Translator`].
//!
//! ## Built-in Rules
//!
//! See [`rules`](mod@rules) for the catalogue registered by
//! [`RuleFactories::builtin`].

pub mod collection;
pub mod declaration;
pub mod error;
pub mod factory;
pub mod locale;
pub mod parser;
pub mod path;
pub mod prelude;
pub mod result;
pub mod rule;
pub mod rules;
pub mod translator;
pub mod validator;
pub mod value;

pub use collection::RulesCollection;
pub use declaration::{EntryRule, RuleDeclaration, RuleEntry, RuleList, Rules, rules};
pub use error::{ConfigError, Failure, RuleError, RuleResult, ValidationError};
pub use factory::ValidatorFactory;
pub use parser::{RuleFactories, RuleFactory, RulesParser};
pub use path::FieldPath;
pub use result::{DataInvalid, ValidationResult};
pub use rule::{Check, Predicate, Rule, RuleContext};
pub use translator::{Translator, TranslatorConfig};
pub use validator::Validator;
pub use value::{UploadedFile, Value};
