//! Date rules, backed by `chrono`.
//!
//! Values and limits are read with [`parse_date`]; `dateformat` instead
//! matches a caller supplied strftime format.

use chrono::format::{self, Item, ParseErrorKind, Parsed, StrftimeItems};
use chrono::{DateTime, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};

use super::{ensure, ensure_plain, joined_param, single_param, two_params};
use crate::error::{ConfigError, Failure, RuleResult};
use crate::rule::{Check, RuleContext};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Reads a date or date-time in one of the accepted notations: RFC 3339,
/// `YYYY-MM-DD[( |T)HH:MM:SS]`, `YYYY/MM/DD` or `DD.MM.YYYY`.
///
/// Offsets are normalized to UTC; dates without a time read as midnight.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Some(datetime.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// A date limit, keeping its source text for messages.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Limit {
    at: NaiveDateTime,
    text: String,
}

impl Limit {
    fn parse(rule: &str, raw: &str) -> Result<Self, ConfigError> {
        let at = parse_date(raw).ok_or_else(|| {
            ConfigError::invalid_parameter(rule, format!("'{raw}' is not a valid date"))
        })?;
        Ok(Self {
            at,
            text: raw.trim().to_owned(),
        })
    }
}

/// Parses the value; `None` when absent, `Some(None)` when unreadable.
fn value_date(ctx: &RuleContext<'_>) -> Option<Option<NaiveDateTime>> {
    if ctx.is_null() {
        return None;
    }
    Some(ctx.value_or_null().as_str().and_then(parse_date))
}

// ============================================================================
// FORMAT
// ============================================================================

/// A string in one of the notations read by [`parse_date`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Date;

impl Check for Date {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        value_date(ctx).map_or(Ok(()), |date| ensure_plain(date.is_some()))
    }
}

/// A string matching a strftime format exactly.
///
/// Formats naming a full date also reject impossible dates such as
/// `2023-02-30`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    format: String,
}

impl DateFormat {
    pub fn new(format: impl Into<String>) -> Result<Self, ConfigError> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::invalid_parameter(
                "dateformat",
                format!("'{format}' is not a valid date format"),
            ));
        }
        Ok(Self { format })
    }

    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Self::new(joined_param("dateformat", params)?)
    }

    fn matches(&self, s: &str) -> bool {
        let mut parsed = Parsed::new();
        if format::parse(&mut parsed, s, StrftimeItems::new(&self.format)).is_err() {
            return false;
        }
        match parsed.to_naive_date() {
            Ok(_) => true,
            Err(err) => err.kind() == ParseErrorKind::NotEnough,
        }
    }
}

impl Check for DateFormat {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        if ctx.is_null() {
            return Ok(());
        }
        let ok = ctx.value_or_null().as_str().is_some_and(|s| self.matches(s));
        ensure(ok, || Failure::new().with_param("format", self.format.clone()))
    }
}

// ============================================================================
// LIMITS
// ============================================================================

/// A date at or after `limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateAfter {
    limit: Limit,
}

impl DateAfter {
    pub fn new(limit: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            limit: Limit::parse("dateafter", limit)?,
        })
    }

    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Self::new(single_param("dateafter", params)?)
    }
}

impl Check for DateAfter {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        value_date(ctx).map_or(Ok(()), |date| {
            ensure(date.is_some_and(|at| at >= self.limit.at), || {
                Failure::new().with_param("limit", self.limit.text.clone())
            })
        })
    }
}

/// A date at or before `limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBefore {
    limit: Limit,
}

impl DateBefore {
    pub fn new(limit: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            limit: Limit::parse("datebefore", limit)?,
        })
    }

    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        Self::new(single_param("datebefore", params)?)
    }
}

impl Check for DateBefore {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        value_date(ctx).map_or(Ok(()), |date| {
            ensure(date.is_some_and(|at| at <= self.limit.at), || {
                Failure::new().with_param("limit", self.limit.text.clone())
            })
        })
    }
}

/// A date within `after..=before`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBetween {
    after: Limit,
    before: Limit,
}

impl DateBetween {
    pub fn new(after: &str, before: &str) -> Result<Self, ConfigError> {
        let after = Limit::parse("datebetween", after)?;
        let before = Limit::parse("datebetween", before)?;
        if after.at > before.at {
            return Err(ConfigError::invalid_parameter(
                "datebetween",
                format!("{} is after {}", after.text, before.text),
            ));
        }
        Ok(Self { after, before })
    }

    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        let (after, before) = two_params("datebetween", params)?;
        Self::new(after, before)
    }
}

impl Check for DateBetween {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        value_date(ctx).map_or(Ok(()), |date| {
            let ok = date.is_some_and(|at| (self.after.at..=self.before.at).contains(&at));
            ensure(ok, || {
                Failure::new()
                    .with_param("after", self.after.text.clone())
                    .with_param("before", self.before.text.clone())
            })
        })
    }
}

// ============================================================================
// BIRTHDAY
// ============================================================================

/// A birth date of someone at least `age` years old today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Birthday {
    age: u32,
}

impl Birthday {
    pub const DEFAULT_AGE: u32 = 18;

    pub fn new(age: u32) -> Result<Self, ConfigError> {
        if age == 0 {
            return Err(ConfigError::invalid_parameter(
                "birthday",
                "age must be a positive integer",
            ));
        }
        Ok(Self { age })
    }

    pub fn from_params(params: &[String]) -> Result<Self, ConfigError> {
        if params.is_empty() {
            return Self::new(Self::DEFAULT_AGE);
        }
        let raw = single_param("birthday", params)?;
        let age = raw.trim().parse::<u32>().map_err(|_| {
            ConfigError::invalid_parameter(
                "birthday",
                format!("age '{raw}' must be a positive integer"),
            )
        })?;
        Self::new(age)
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    /// Latest birth date accepted on `today`.
    fn latest_birth_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        today.checked_sub_months(Months::new(self.age.saturating_mul(12)))
    }

    fn born_in_time(&self, born: NaiveDate, today: NaiveDate) -> bool {
        self.latest_birth_date(today)
            .is_some_and(|latest| born <= latest)
    }
}

impl Default for Birthday {
    fn default() -> Self {
        Self {
            age: Self::DEFAULT_AGE,
        }
    }
}

impl Check for Birthday {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        value_date(ctx).map_or(Ok(()), |date| {
            let today = Local::now().date_naive();
            let ok = date.is_some_and(|at| self.born_in_time(at.date(), today));
            ensure(ok, || Failure::new().with_param("age", self.age.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::RuleDeclaration;
    use crate::error::RuleError;
    use crate::parser::{RuleFactories, RulesParser};
    use crate::rules::testing::{fails, passes, run_missing, run_value};
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("2024-03-01", true)]
    #[case("2024-03-01 10:30:00", true)]
    #[case("2024-03-01T10:30:00", true)]
    #[case("2024-03-01T10:30:00+02:00", true)]
    #[case("2024/03/01", true)]
    #[case("01.03.2024", true)]
    #[case("2023-02-30", false)]
    #[case("yesterday-ish", false)]
    #[case("", false)]
    fn date(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(passes(&Date, value), ok);
    }

    #[test]
    fn rfc3339_offsets_normalize_to_utc() {
        let at = parse_date("2024-03-01T01:00:00+02:00").unwrap();
        assert_eq!(at, day(2024, 2, 29).and_hms_opt(23, 0, 0).unwrap());
    }

    #[test]
    fn date_rules_skip_null_and_reject_non_strings() {
        assert!(run_missing(&Date).is_ok());
        assert!(passes(&Date, Value::Null));
        assert!(fails(&Date, 20_240_301));
    }

    #[rstest]
    #[case("%Y-%m-%d", "2024-03-01", true)]
    #[case("%Y-%m-%d", "2024-02-30", false)]
    #[case("%Y-%m-%d", "01/03/2024", false)]
    #[case("%d/%m", "01/03", true)]
    #[case("%H:%M", "10:30", true)]
    #[case("%H:%M", "10:30:00", false)]
    fn dateformat(#[case] format: &str, #[case] value: &str, #[case] ok: bool) {
        let rule = DateFormat::new(format).unwrap();
        assert_eq!(passes(&rule, value), ok);
    }

    #[test]
    fn dateformat_reports_the_declared_format() {
        let parser = RulesParser::new(RuleFactories::builtin());
        let rules = parser
            .parse(&RuleDeclaration::from("dateformat: %d, %m "))
            .unwrap();
        let input: Value = [("field", Value::from("nope"))].into_iter().collect();

        let Err(RuleError::Failed(failure)) = rules.rules()[0].validate("field", &input, &input)
        else {
            panic!("expected a failure");
        };
        assert_eq!(failure.param("format"), Some("%d, %m"));

        let input: Value = [("field", Value::from("01, 03"))].into_iter().collect();
        assert!(rules.rules()[0].validate("field", &input, &input).is_ok());
        assert!(DateFormat::new("%Q").is_err());
    }

    #[test]
    fn after_and_before_are_inclusive() {
        let after = DateAfter::new("2024-01-01").unwrap();
        assert!(passes(&after, "2024-01-01"));
        assert!(passes(&after, "2024-06-01"));
        assert!(fails(&after, "2023-12-31"));
        assert!(fails(&after, "not a date"));

        let before = DateBefore::new("2024-01-01").unwrap();
        assert!(passes(&before, "2023-12-31 23:59:59"));
        assert!(fails(&before, "2024-01-01 00:00:01"));
    }

    #[test]
    fn invalid_limits_are_config_errors() {
        assert!(matches!(
            DateAfter::new("someday"),
            Err(ConfigError::InvalidParameter { .. })
        ));
        assert!(DateBefore::from_params(&[]).is_err());
        assert!(DateBetween::new("2024-12-31", "2024-01-01").is_err());
    }

    #[test]
    fn datebetween_reports_both_limits() {
        let rule = DateBetween::from_params(&["2024-01-01".to_owned(), "2024-12-31".to_owned()])
            .unwrap();
        assert!(passes(&rule, "2024-07-14"));

        let Err(RuleError::Failed(failure)) = run_value(&rule, "2025-01-01") else {
            panic!("expected a failure");
        };
        assert_eq!(failure.param("after"), Some("2024-01-01"));
        assert_eq!(failure.param("before"), Some("2024-12-31"));
    }

    #[test]
    fn birthday_parameters() {
        assert_eq!(Birthday::from_params(&[]).unwrap().age(), 18);
        assert_eq!(Birthday::from_params(&["21".to_owned()]).unwrap().age(), 21);
        assert!(Birthday::from_params(&["0".to_owned()]).is_err());
        assert!(Birthday::from_params(&["-3".to_owned()]).is_err());
        assert!(Birthday::from_params(&["adult".to_owned()]).is_err());
    }

    #[test]
    fn birthday_counts_whole_years() {
        let rule = Birthday::default();
        let today = day(2024, 6, 15);
        assert!(rule.born_in_time(day(2006, 6, 15), today));
        assert!(rule.born_in_time(day(1990, 1, 1), today));
        assert!(!rule.born_in_time(day(2006, 6, 16), today));
    }

    #[test]
    fn birthday_against_the_clock() {
        let rule = Birthday::new(18).unwrap();
        assert!(passes(&rule, "1970-01-01"));
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert!(fails(&rule, today));

        let Err(RuleError::Failed(failure)) = run_value(&rule, "garbage") else {
            panic!("expected a failure");
        };
        assert_eq!(failure.param("age"), Some("18"));
    }
}
