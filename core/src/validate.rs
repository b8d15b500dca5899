//! Scalar coercion and validation primitives.
//!
//! # Design
//! Every primitive takes a raw JSON value, the field name it is validating
//! and an `allow_empty` flag. "Empty" means the value is absent, `null`, or
//! an empty string. With `allow_empty` set, an empty value yields `Ok(None)`;
//! otherwise it fails with `Constraint::Empty`. Non-empty values are coerced
//! to their canonical Rust type or rejected with a `ValidationError` naming
//! the field and the violated constraint.
//!
//! The typed setters on `LocationScore` call the same checks through the
//! `check_*` helpers, so a record never holds an out-of-contract value.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;
use url::Url;

/// The rule a value broke.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Empty,
    NotAnInteger,
    NotANumber,
    NotAString,
    BelowMinimum(f64),
    AboveMaximum(f64),
    InvalidUrl(String),
    InvalidTimestamp(String),
    NotAnObject,
    /// Rejected for a reason reported by the service.
    Rejected(String),
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Empty => write!(f, "value must not be empty"),
            Constraint::NotAnInteger => write!(f, "value is not an integer"),
            Constraint::NotANumber => write!(f, "value is not numeric"),
            Constraint::NotAString => write!(f, "value cannot be coerced to a string"),
            Constraint::BelowMinimum(min) => write!(f, "value is below the minimum of {min}"),
            Constraint::AboveMaximum(max) => write!(f, "value is above the maximum of {max}"),
            Constraint::InvalidUrl(reason) => write!(f, "value is not a valid URL: {reason}"),
            Constraint::InvalidTimestamp(raw) => write!(f, "value is not a timestamp: {raw}"),
            Constraint::NotAnObject => write!(f, "value is not a JSON object"),
            Constraint::Rejected(reason) => write!(f, "value was rejected: {reason}"),
        }
    }
}

/// A field was given a value outside its contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid `{field}`: {constraint}")]
pub struct ValidationError {
    pub field: &'static str,
    pub constraint: Constraint,
}

impl ValidationError {
    pub fn new(field: &'static str, constraint: Constraint) -> Self {
        Self { field, constraint }
    }
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

fn empty(field: &'static str, allow_empty: bool) -> Result<Option<()>, ValidationError> {
    if allow_empty {
        Ok(None)
    } else {
        Err(ValidationError::new(field, Constraint::Empty))
    }
}

/// Coerce `value` to an integer within the optional `[min, max]` bounds.
///
/// Accepts JSON integers, floats without a fractional part and numeric
/// strings.
pub fn integer(
    value: Option<&Value>,
    field: &'static str,
    allow_empty: bool,
    min: Option<i64>,
    max: Option<i64>,
) -> Result<Option<i64>, ValidationError> {
    if is_empty(value) {
        return empty(field, allow_empty).map(|_| None);
    }
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(whole_number)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_number))
        }
        _ => None,
    };
    let parsed = parsed.ok_or(ValidationError::new(field, Constraint::NotAnInteger))?;
    check_bounds(parsed, field, min, max).map(Some)
}

fn whole_number(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Enforce inclusive integer bounds.
pub fn check_bounds(
    value: i64,
    field: &'static str,
    min: Option<i64>,
    max: Option<i64>,
) -> Result<i64, ValidationError> {
    if let Some(min) = min {
        if value < min {
            return Err(ValidationError::new(field, Constraint::BelowMinimum(min as f64)));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(ValidationError::new(field, Constraint::AboveMaximum(max as f64)));
        }
    }
    Ok(value)
}

/// Coerce `value` to a finite float. Accepts JSON numbers and numeric strings.
pub fn float(
    value: Option<&Value>,
    field: &'static str,
    allow_empty: bool,
) -> Result<Option<f64>, ValidationError> {
    if is_empty(value) {
        return empty(field, allow_empty).map(|_| None);
    }
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(f) => check_finite(f, field).map(Some),
        None => Err(ValidationError::new(field, Constraint::NotANumber)),
    }
}

/// Reject NaN and the infinities.
pub fn check_finite(value: f64, field: &'static str) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::new(field, Constraint::NotANumber))
    }
}

/// Coerce `value` to a string. Numbers and booleans are rendered; arrays and
/// objects are rejected.
pub fn string(
    value: Option<&Value>,
    field: &'static str,
    allow_empty: bool,
) -> Result<Option<String>, ValidationError> {
    if is_empty(value) {
        return empty(field, allow_empty).map(|_| None);
    }
    match value {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        _ => Err(ValidationError::new(field, Constraint::NotAString)),
    }
}

/// Validate that `value` is a well-formed absolute URL, returning the
/// original text.
pub fn url(
    value: Option<&Value>,
    field: &'static str,
    allow_empty: bool,
) -> Result<Option<String>, ValidationError> {
    match string(value, field, allow_empty)? {
        Some(raw) => check_url(&raw, field).map(|_| Some(raw)),
        None => Ok(None),
    }
}

/// Parse `raw` as an absolute URL with a host-bearing scheme.
pub fn check_url(raw: &str, field: &'static str) -> Result<Url, ValidationError> {
    let parsed =
        Url::parse(raw).map_err(|e| ValidationError::new(field, Constraint::InvalidUrl(e.to_string())))?;
    if parsed.cannot_be_a_base() || parsed.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::new(
            field,
            Constraint::InvalidUrl("URL has no host".to_string()),
        ));
    }
    Ok(parsed)
}

/// Coerce `value` to a UTC timestamp.
///
/// Accepts RFC 3339 strings, naive `YYYY-MM-DD HH:MM:SS[.ffffff]` strings
/// (read as UTC) and integer Unix seconds.
pub fn timestamp(
    value: Option<&Value>,
    field: &'static str,
    allow_empty: bool,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    if is_empty(value) {
        return empty(field, allow_empty).map(|_| None);
    }
    let invalid = |raw: String| ValidationError::new(field, Constraint::InvalidTimestamp(raw));
    let parsed = match value {
        Some(Value::String(s)) => parse_timestamp(s).ok_or_else(|| invalid(s.clone()))?,
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .ok_or_else(|| invalid(n.to_string()))?,
        Some(other) => return Err(invalid(other.to_string())),
        None => return Ok(None),
    };
    check_timestamp(parsed, field).map(Some)
}

/// Accept only instants with a four-digit year, the range RFC 3339 can
/// write and read back.
pub fn check_timestamp(value: DateTime<Utc>, field: &'static str) -> Result<DateTime<Utc>, ValidationError> {
    if (0..=9999).contains(&value.year()) {
        Ok(value)
    } else {
        let raw = value.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        Err(ValidationError::new(field, Constraint::InvalidTimestamp(raw)))
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_values_respect_allow_empty() {
        for raw in [None, Some(json!(null)), Some(json!(""))] {
            assert_eq!(integer(raw.as_ref(), "n", true, None, None).unwrap(), None);
            let err = integer(raw.as_ref(), "n", false, None, None).unwrap_err();
            assert_eq!(err.constraint, Constraint::Empty);
            assert_eq!(err.field, "n");
        }
    }

    #[test]
    fn integer_coerces_strings_and_whole_floats() {
        assert_eq!(integer(Some(&json!("42")), "n", false, None, None).unwrap(), Some(42));
        assert_eq!(integer(Some(&json!(7.0)), "n", false, None, None).unwrap(), Some(7));
        let err = integer(Some(&json!(7.5)), "n", false, None, None).unwrap_err();
        assert_eq!(err.constraint, Constraint::NotAnInteger);
        let err = integer(Some(&json!("abc")), "n", false, None, None).unwrap_err();
        assert_eq!(err.constraint, Constraint::NotAnInteger);
    }

    #[test]
    fn integer_enforces_bounds() {
        let bounded = |v: Value| integer(Some(&v), "score", true, Some(0), Some(100));
        assert_eq!(bounded(json!(0)).unwrap(), Some(0));
        assert_eq!(bounded(json!(100)).unwrap(), Some(100));
        assert!(matches!(bounded(json!(-1)).unwrap_err().constraint, Constraint::BelowMinimum(_)));
        assert!(matches!(bounded(json!(101)).unwrap_err().constraint, Constraint::AboveMaximum(_)));
    }

    #[test]
    fn float_rejects_non_numeric() {
        assert_eq!(float(Some(&json!("47.6085")), "lat", false).unwrap(), Some(47.6085));
        assert_eq!(float(Some(&json!(-122)), "lon", false).unwrap(), Some(-122.0));
        assert_eq!(
            float(Some(&json!([1])), "lat", false).unwrap_err().constraint,
            Constraint::NotANumber
        );
        assert!(check_finite(f64::NAN, "lat").is_err());
    }

    #[test]
    fn string_rejects_containers() {
        assert_eq!(string(Some(&json!(12)), "s", true).unwrap().as_deref(), Some("12"));
        assert_eq!(
            string(Some(&json!({"a": 1})), "s", true).unwrap_err().constraint,
            Constraint::NotAString
        );
    }

    #[test]
    fn url_requires_absolute_form() {
        assert_eq!(
            url(Some(&json!("http://example.com")), "u", true).unwrap().as_deref(),
            Some("http://example.com")
        );
        for bad in ["not a url", "/relative/path", "example.com", "mailto:someone@example.com"] {
            let err = url(Some(&json!(bad)), "u", true).unwrap_err();
            assert!(matches!(err.constraint, Constraint::InvalidUrl(_)), "{bad}");
        }
    }

    #[test]
    fn timestamp_accepts_service_and_rfc3339_forms() {
        let naive = timestamp(Some(&json!("2009-12-25 03:40:16.006257")), "t", false)
            .unwrap()
            .unwrap();
        let rfc = timestamp(Some(&json!("2009-12-25T03:40:16.006257+00:00")), "t", false)
            .unwrap()
            .unwrap();
        assert_eq!(naive, rfc);

        let epoch = timestamp(Some(&json!(0)), "t", false).unwrap().unwrap();
        assert_eq!(epoch.timestamp(), 0);

        let err = timestamp(Some(&json!("yesterday")), "t", false).unwrap_err();
        assert!(matches!(err.constraint, Constraint::InvalidTimestamp(_)));
    }

    #[test]
    fn timestamp_rejects_five_digit_years() {
        // 253402300800 is 10000-01-01T00:00:00Z.
        let err = timestamp(Some(&json!(253_402_300_800i64)), "t", false).unwrap_err();
        assert!(matches!(err.constraint, Constraint::InvalidTimestamp(_)));
        assert!(timestamp(Some(&json!(253_402_300_799i64)), "t", false).unwrap().is_some());

        let err = timestamp(Some(&json!("+10000-01-01 00:00:00")), "t", false).unwrap_err();
        assert!(matches!(err.constraint, Constraint::InvalidTimestamp(_)));
    }
}
