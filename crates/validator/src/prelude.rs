//! Prelude module for convenient imports.
//!
//! Brings in everything an application needs to declare rules, run a
//! validator and present its messages.
//!
//! # Examples
//!
//! ```rust
//! use tessera_validator::prelude::*;
//!
//! let factory = ValidatorFactory::create(DEFAULT_LOCALE).unwrap();
//! let validator = factory.validator(rules([("tags.*", "slug")]));
//!
//! let input = Value::from(serde_json::json!({"tags": ["rust", "not ok"]}));
//! assert!(validator.validate(&input).unwrap().failed());
//! ```

// ============================================================================
// DECLARING
// ============================================================================

pub use crate::declaration::{RuleDeclaration, RuleList, Rules, rules};
pub use crate::rule::{Check, Predicate, RuleContext};

// ============================================================================
// RUNNING
// ============================================================================

pub use crate::factory::ValidatorFactory;
pub use crate::locale::DEFAULT_LOCALE;
pub use crate::parser::RuleFactories;
pub use crate::validator::Validator;
pub use crate::value::{UploadedFile, Value};

// ============================================================================
// OUTCOMES
// ============================================================================

pub use crate::error::{ConfigError, Failure, RuleError, RuleResult, ValidationError};
pub use crate::result::{DataInvalid, ValidationResult};
pub use crate::translator::{Translator, TranslatorConfig};
