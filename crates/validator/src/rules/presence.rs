//! Presence rules: whether a key exists and carries something.

use super::ensure_plain;
use crate::error::RuleResult;
use crate::rule::{Check, RuleContext};
use crate::value::Value;

/// The key must exist in its scope, even with a `null` value.
///
/// On a bare wildcard target the scope itself must be a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Present;

impl Check for Present {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let present = if ctx.is_collection() {
            ctx.scope().is_container()
        } else {
            !ctx.is_missing()
        };
        ensure_plain(present)
    }
}

/// Strings must not be whitespace only; files must carry a client file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotBlank;

impl Check for NotBlank {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let blank = match ctx.value() {
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(Value::File(file)) => file.client_filename.as_deref().is_none_or(str::is_empty),
            _ => false,
        };
        ensure_plain(!blank)
    }
}

/// [`Present`] and [`NotBlank`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Required;

impl Check for Required {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        Present.check(ctx)?;
        NotBlank.check(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::rules::testing::{fails, passes, run, run_missing};
    use crate::value::UploadedFile;
    use serde_json::json;

    #[test]
    fn present_accepts_null_but_not_absence() {
        assert!(passes(&Present, Value::Null));
        assert!(passes(&Present, ""));
        assert!(run_missing(&Present).is_err());
    }

    #[test]
    fn present_on_a_collection() {
        let list = Value::from(json!([1]));
        assert!(run(&Present, "*", &list).is_ok());
        assert!(run(&Present, "*", &Value::Null).is_err());
    }

    #[test]
    fn notblank_rejects_whitespace_strings() {
        assert!(fails(&NotBlank, "   "));
        assert!(fails(&NotBlank, ""));
        assert!(passes(&NotBlank, " x "));
        assert!(passes(&NotBlank, Value::Null));
        assert!(passes(&NotBlank, 0));
        assert!(run_missing(&NotBlank).is_ok());
    }

    #[test]
    fn notblank_checks_file_names() {
        assert!(passes(&NotBlank, UploadedFile::new("a.txt")));
        assert!(fails(&NotBlank, UploadedFile::new("")));
        assert!(fails(&NotBlank, UploadedFile::default()));
    }

    #[test]
    fn required_combines_both() {
        assert!(matches!(run_missing(&Required), Err(RuleError::Failed(_))));
        assert!(fails(&Required, " "));
        assert!(passes(&Required, "value"));
        assert!(passes(&Required, Value::Null));
    }
}
