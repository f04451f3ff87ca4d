//! Built-in rules.
//!
//! Every rule is a small type implementing [`Check`](crate::Check), built
//! from the string parameters of its factory string. Unless documented
//! otherwise a rule passes when the value is missing or `null`, leaving
//! absence to `required` and `present`.
//!
//! | Family      | Rules                                                                  |
//! |-------------|------------------------------------------------------------------------|
//! | presence    | `present`, `notblank`, `required`                                      |
//! | types       | `array`, `boolean`, `numeric`, `integer`                               |
//! | string      | `alpha`, `alphanum`, `slug`, `regex`                                   |
//! | network     | `email`, `ip`, `url`, `urlactive`                                      |
//! | numeric     | `min`, `max`, `between`                                                |
//! | comparison  | `equals`, `different`, `in`, `notin`, `accepted`, `notaccepted`        |
//! | date        | `date`, `dateformat`, `dateafter`, `datebefore`, `datebetween`, `birthday` |
//! | file        | `file`, `extension`, `mimetype`, `size`                                |
//! | collection  | `havedifferent`, `havesame`                                            |

pub mod comparison;
pub mod date;
pub mod distinct;
pub mod file;
pub mod network;
pub mod numeric;
pub mod presence;
pub mod string;
pub mod types;

pub use comparison::{Accepted, Different, Equals, In, NotAccepted, NotIn};
pub use date::{Birthday, Date, DateAfter, DateBefore, DateBetween, DateFormat};
pub use distinct::{HaveDifferent, HaveSame};
pub use file::{Extension, File, MimeType, Size};
pub use network::{Email, HostResolver, Ip, SystemResolver, Url, UrlActive};
pub use numeric::{Between, Max, Min};
pub use presence::{NotBlank, Present, Required};
pub use string::{Alpha, AlphaNum, Regex, Slug};
pub use types::{Array, Boolean, Integer, Numeric};

use crate::error::{ConfigError, Failure, RuleResult};
use crate::parser::RuleFactories;

/// Registers every built-in rule.
pub(crate) fn register(factories: &mut RuleFactories) {
    factories.register("present", |_| Ok(Present));
    factories.register("notblank", |_| Ok(NotBlank));
    factories.register("required", |_| Ok(Required));

    factories.register("array", |_| Ok(Array));
    factories.register("boolean", |_| Ok(Boolean));
    factories.register("numeric", |_| Ok(Numeric));
    factories.register("integer", |_| Ok(Integer));

    factories.register("alpha", |_| Ok(Alpha));
    factories.register("alphanum", |_| Ok(AlphaNum));
    factories.register("slug", |_| Ok(Slug));
    factories.register_unsplit("regex", Regex::from_params);

    factories.register("email", |_| Ok(Email));
    factories.register("ip", |_| Ok(Ip));
    factories.register("url", |_| Ok(Url));
    factories.register("urlactive", |_| Ok(UrlActive::default()));

    factories.register("min", Min::from_params);
    factories.register("max", Max::from_params);
    factories.register("between", Between::from_params);

    factories.register("equals", Equals::from_params);
    factories.register("different", Different::from_params);
    factories.register("in", In::from_params);
    factories.register("notin", NotIn::from_params);
    factories.register("accepted", |_| Ok(Accepted));
    factories.register("notaccepted", |_| Ok(NotAccepted));

    factories.register("date", |_| Ok(Date));
    factories.register_unsplit("dateformat", DateFormat::from_params);
    factories.register("dateafter", DateAfter::from_params);
    factories.register("datebefore", DateBefore::from_params);
    factories.register("datebetween", DateBetween::from_params);
    factories.register("birthday", Birthday::from_params);

    factories.register("file", |_| Ok(File));
    factories.register("extension", Extension::from_params);
    factories.register("mimetype", MimeType::from_params);
    factories.register("size", Size::from_params);

    factories.register("havedifferent", HaveDifferent::from_params);
    factories.register("havesame", HaveSame::from_params);
}

// ============================================================================
// HELPERS
// ============================================================================

/// Fails with `failure` unless `ok`.
pub(crate) fn ensure(ok: bool, failure: impl FnOnce() -> Failure) -> RuleResult {
    if ok { Ok(()) } else { Err(failure().into()) }
}

/// Fails without parameters unless `ok`.
pub(crate) fn ensure_plain(ok: bool) -> RuleResult {
    ensure(ok, Failure::new)
}

/// Returns the single parameter of `rule`.
pub(crate) fn single_param<'a>(rule: &str, params: &'a [String]) -> Result<&'a str, ConfigError> {
    match params {
        [param] => Ok(param.as_str()),
        _ => Err(ConfigError::invalid_parameter(
            rule,
            format!("expected exactly one parameter, got {}", params.len()),
        )),
    }
}

/// Returns both parameters of a two-parameter rule.
pub(crate) fn two_params<'a>(
    rule: &str,
    params: &'a [String],
) -> Result<(&'a str, &'a str), ConfigError> {
    match params {
        [first, second] => Ok((first.as_str(), second.as_str())),
        _ => Err(ConfigError::invalid_parameter(
            rule,
            format!("expected exactly two parameters, got {}", params.len()),
        )),
    }
}

/// Returns a non-empty parameter list.
pub(crate) fn non_empty_params(rule: &str, params: &[String]) -> Result<Vec<String>, ConfigError> {
    let params: Vec<String> = params.iter().filter(|p| !p.is_empty()).cloned().collect();
    if params.is_empty() {
        return Err(ConfigError::invalid_parameter(
            rule,
            "expected at least one parameter",
        ));
    }
    Ok(params)
}

/// Rejoins parameters split on `,`, for rules whose single argument may
/// contain commas (patterns, formats).
pub(crate) fn joined_param(rule: &str, params: &[String]) -> Result<String, ConfigError> {
    let joined = params.join(",");
    if joined.is_empty() {
        return Err(ConfigError::invalid_parameter(rule, "expected a parameter"));
    }
    Ok(joined)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::error::{RuleError, RuleResult};
    use crate::rule::{Check, RuleContext};
    use crate::value::Value;

    /// Runs `check` on `input[key]`.
    pub fn run(check: &impl Check, key: &str, input: &Value) -> RuleResult {
        let ctx = RuleContext::new(key, input.get(key), input, input);
        check.check(&ctx)
    }

    /// Runs `check` on a single value stored under `"field"`.
    pub fn run_value(check: &impl Check, value: impl Into<Value>) -> RuleResult {
        let value: Value = value.into();
        let input: Value = [("field", value)].into_iter().collect();
        run(check, "field", &input)
    }

    pub fn passes(check: &impl Check, value: impl Into<Value>) -> bool {
        run_value(check, value).is_ok()
    }

    pub fn fails(check: &impl Check, value: impl Into<Value>) -> bool {
        matches!(run_value(check, value), Err(RuleError::Failed(_)))
    }

    pub fn misapplied(check: &impl Check, value: impl Into<Value>) -> bool {
        matches!(run_value(check, value), Err(RuleError::Config(_)))
    }

    /// Runs `check` on a missing key.
    pub fn run_missing(check: &impl Check) -> RuleResult {
        run(check, "field", &Value::Object(indexmap::IndexMap::new()))
    }
}
