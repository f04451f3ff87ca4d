//! Uploaded file rules.
//!
//! `extension`, `mimetype` and `size` only make sense on files; applying them
//! to any other non-null value is a configuration error. A file missing the
//! attribute a rule inspects fails that rule.

use super::{ensure, ensure_plain, non_empty_params, single_param};
use crate::error::{ConfigError, Failure, RuleError, RuleResult};
use crate::rule::{Check, RuleContext};
use crate::value::UploadedFile;

/// The file under validation; `None` when absent.
fn uploaded<'a>(
    rule: &str,
    ctx: &RuleContext<'a>,
) -> Result<Option<&'a UploadedFile>, RuleError> {
    if ctx.is_null() {
        return Ok(None);
    }
    let value = ctx.value_or_null();
    value.as_file().map(Some).ok_or_else(|| {
        ConfigError::unsupported_value(
            rule,
            format!("expected an uploaded file, got a {}", value.type_name()),
        )
        .into()
    })
}

/// An uploaded file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct File;

impl Check for File {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        if ctx.is_null() {
            return Ok(());
        }
        ensure_plain(ctx.value_or_null().as_file().is_some())
    }
}

/// A client file name with one of the listed extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    extensions: Vec<String>,
}

impl Extension {
    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            extensions: non_empty_params("extension", params)?,
        })
    }
}

impl Check for Extension {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let Some(file) = uploaded("extension", ctx)? else {
            return Ok(());
        };
        let ok = file
            .extension()
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext));
        ensure(ok, || {
            Failure::new().with_param("extensions", self.extensions.join(", "))
        })
    }
}

/// A client media type among the listed ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeType {
    types: Vec<String>,
}

impl MimeType {
    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            types: non_empty_params("mimetype", params)?,
        })
    }
}

impl Check for MimeType {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let Some(file) = uploaded("mimetype", ctx)? else {
            return Ok(());
        };
        let ok = file
            .client_media_type
            .as_deref()
            .is_some_and(|media_type| self.types.iter().any(|allowed| allowed == media_type));
        ensure(ok, || {
            Failure::new().with_param("mimetypes", self.types.join(", "))
        })
    }
}

/// A file of at most `kilobytes` KiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    kilobytes: u64,
}

impl Size {
    pub fn new(kilobytes: u64) -> Result<Self, ConfigError> {
        if kilobytes == 0 {
            return Err(ConfigError::invalid_parameter(
                "size",
                "limit must be a positive integer",
            ));
        }
        Ok(Self { kilobytes })
    }

    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        let raw = single_param("size", params)?;
        let kilobytes = raw.trim().parse::<u64>().map_err(|_| {
            ConfigError::invalid_parameter(
                "size",
                format!("limit '{raw}' must be a positive integer"),
            )
        })?;
        Self::new(kilobytes)
    }

    pub fn kilobytes(&self) -> u64 {
        self.kilobytes
    }
}

impl Check for Size {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let Some(file) = uploaded("size", ctx)? else {
            return Ok(());
        };
        let ok = file
            .size
            .is_some_and(|bytes| bytes as f64 / 1024.0 <= self.kilobytes as f64);
        ensure(ok, || {
            Failure::new().with_param("size", self.kilobytes.to_string())
        })
    }
}
