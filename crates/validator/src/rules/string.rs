//! String format rules.

use std::sync::LazyLock;

use super::{ensure, ensure_plain, joined_param};
use crate::error::{ConfigError, Failure, RuleResult};
use crate::rule::{Check, RuleContext};

static ALPHA_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?i)^[a-z]+$").expect("alpha pattern is valid"));

static ALPHANUM_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?i)^[a-z0-9]+$").expect("alphanum pattern is valid"));

static SLUG_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?i)^[-a-z0-9_]+$").expect("slug pattern is valid"));

/// Runs `pattern` over the textual form of the value (strings and numbers);
/// other values never match.
fn match_text(ctx: &RuleContext<'_>, pattern: &regex::Regex) -> Option<bool> {
    if ctx.is_null() {
        return None;
    }
    Some(
        ctx.value_or_null()
            .as_text()
            .is_some_and(|text| pattern.is_match(&text)),
    )
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

/// ASCII letters only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alpha;

impl Check for Alpha {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        match_text(ctx, &ALPHA_REGEX).map_or(Ok(()), ensure_plain)
    }
}

/// ASCII letters and digits only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlphaNum;

impl Check for AlphaNum {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        match_text(ctx, &ALPHANUM_REGEX).map_or(Ok(()), ensure_plain)
    }
}

/// ASCII letters, digits, dashes and underscores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slug;

impl Check for Slug {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        match_text(ctx, &SLUG_REGEX).map_or(Ok(()), ensure_plain)
    }
}

// ============================================================================
// REGEX
// ============================================================================

/// Matches a user supplied pattern.
///
/// The pattern is either a raw regular expression or delimited as
/// `/pattern/flags` with flags among `i`, `m`, `s`, `x` and `u` (the last is
/// accepted and ignored, matching is always Unicode aware).
#[derive(Debug, Clone)]
pub struct Regex {
    source: String,
    pattern: regex::Regex,
}

impl Regex {
    /// Compiles `source`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] for unknown flags or a pattern that
    /// does not compile.
    pub fn new(source: impl Into<String>) -> Result<Self, ConfigError> {
        let source = source.into();
        let pattern = regex::Regex::new(&translate_delimited(&source)?)
            .map_err(|err| ConfigError::invalid_parameter("regex", err.to_string()))?;
        Ok(Self { source, pattern })
    }

    /// Builds the rule from its parameters; commas inside the pattern are
    /// restored.
    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Self::new(joined_param("regex", params)?)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Check for Regex {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        match_text(ctx, &self.pattern).map_or(Ok(()), |ok| {
            ensure(ok, || {
                Failure::new().with_param("pattern", self.source.clone())
            })
        })
    }
}

/// Turns `/pattern/flags` into `(?flags)pattern`; anything else is taken as
/// a raw pattern.
fn translate_delimited(source: &str) -> Result<String, ConfigError> {
    let Some(body) = source.strip_prefix('/') else {
        return Ok(source.to_owned());
    };
    let Some(end) = body.rfind('/') else {
        return Ok(source.to_owned());
    };

    let (pattern, flags) = (&body[..end], &body[end + 1..]);
    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' => inline.push(flag),
            'u' => {}
            other => {
                return Err(ConfigError::invalid_parameter(
                    "regex",
                    format!("unsupported pattern flag '{other}'"),
                ));
            }
        }
    }

    Ok(if inline.is_empty() {
        pattern.to_owned()
    } else {
        format!("(?{inline}){pattern}")
    })
}
