//! Resolving timestamp inputs into `DateTime<Utc>`.
//!
//! Range boundaries and lookups accept either an already-typed instant or a
//! string. Strings are parsed strictly; anything without an explicit offset
//! is read as UTC.
//!
//! Accepted text forms:
//!
//! - RFC 3339: `2019-01-06T17:20:00Z`, `2019-01-06T18:20:00+01:00`
//! - Date and time without offset: `2019-01-06 17:20`, `2019-01-06T17:20:00`
//! - Date only (midnight): `2019-01-06`

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{Result, SliceError};

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// A timestamp argument: a typed instant or text to be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeArg {
    /// An instant used as-is.
    At(DateTime<Utc>),
    /// Text resolved with [`parse_timestamp`] when used.
    Text(String),
}

impl TimeArg {
    /// Resolve to a concrete instant.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidDatetime`] if text cannot be parsed.
    pub fn resolve(&self) -> Result<DateTime<Utc>> {
        match self {
            TimeArg::At(dt) => Ok(*dt),
            TimeArg::Text(s) => parse_timestamp(s),
        }
    }
}

impl From<DateTime<Utc>> for TimeArg {
    fn from(dt: DateTime<Utc>) -> Self {
        TimeArg::At(dt)
    }
}

impl From<&DateTime<Utc>> for TimeArg {
    fn from(dt: &DateTime<Utc>) -> Self {
        TimeArg::At(*dt)
    }
}

impl From<&str> for TimeArg {
    fn from(s: &str) -> Self {
        TimeArg::Text(s.to_string())
    }
}

impl From<String> for TimeArg {
    fn from(s: String) -> Self {
        TimeArg::Text(s)
    }
}

/// Parse a timestamp string into `DateTime<Utc>`.
///
/// # Errors
///
/// Returns [`SliceError::InvalidDatetime`] if none of the accepted forms match.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use time_slice::parse_timestamp;
///
/// let expected = Utc.with_ymd_and_hms(2019, 1, 6, 17, 20, 0).unwrap();
/// assert_eq!(parse_timestamp("2019-01-06T17:20:00Z").unwrap(), expected);
/// assert_eq!(parse_timestamp("2019-01-06 17:20").unwrap(), expected);
/// assert!(parse_timestamp("next tuesday").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Ok(naive.and_utc());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| SliceError::InvalidDatetime(format!("'{s}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_rfc3339_utc() {
        assert_eq!(
            parse_timestamp("2019-01-06T12:00:00Z").unwrap(),
            utc(2019, 1, 6, 12, 0, 0)
        );
    }

    #[test]
    fn test_parse_rfc3339_with_offset_converts_to_utc() {
        assert_eq!(
            parse_timestamp("2019-01-06T12:00:00+02:00").unwrap(),
            utc(2019, 1, 6, 10, 0, 0)
        );
    }

    #[test]
    fn test_parse_naive_forms_as_utc() {
        let expected = utc(2019, 1, 6, 17, 20, 0);
        assert_eq!(parse_timestamp("2019-01-06 17:20").unwrap(), expected);
        assert_eq!(parse_timestamp("2019-01-06 17:20:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2019-01-06T17:20").unwrap(), expected);
        assert_eq!(parse_timestamp("2019-01-06T17:20:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2019-01-06 17:20:30").unwrap(),
            utc(2019, 1, 6, 17, 20, 30)
        );
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        assert_eq!(parse_timestamp("2019-01-05").unwrap(), utc(2019, 1, 5, 0, 0, 0));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_timestamp("  2019-01-05 ").unwrap(), utc(2019, 1, 5, 0, 0, 0));
    }

    #[test]
    fn test_parse_invalid_returns_error() {
        for text in ["", "tomorrow", "2019-13-01", "2019-01-06 25:00", "17:20"] {
            let err = parse_timestamp(text).unwrap_err().to_string();
            assert!(err.contains("Invalid datetime"), "got: {err}");
        }
    }

    #[test]
    fn test_time_arg_resolve() {
        let at = utc(2019, 1, 6, 12, 0, 0);
        assert_eq!(TimeArg::from(at).resolve().unwrap(), at);
        assert_eq!(TimeArg::from(&at).resolve().unwrap(), at);
        assert_eq!(TimeArg::from("2019-01-06 12:00").resolve().unwrap(), at);
        assert_eq!(
            TimeArg::from(String::from("2019-01-06T12:00:00Z")).resolve().unwrap(),
            at
        );
        assert!(TimeArg::from("noon").resolve().is_err());
    }
}
