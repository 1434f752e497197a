//! Recurring interval lengths parsed from compact period strings.
//!
//! A [`Duration`] is a positive count of a single [`Unit`]: `"5m"`, `"2h"`,
//! `"1mo"`. All interval arithmetic goes through the duration's
//! seconds-equivalent. Seconds through weeks are exact; months and years use
//! the average Gregorian lengths (30.436875 and 365.2425 days), so they are
//! approximations of any particular calendar month or year.
//!
//! # Period Grammar
//!
//! `<digits><unit>` with no sign, whitespace, or decimal point. Unit codes are
//! case-sensitive:
//!
//! | code | unit    | seconds    |
//! |------|---------|------------|
//! | `s`  | seconds | 1          |
//! | `m`  | minutes | 60         |
//! | `h`  | hours   | 3600       |
//! | `d`  | days    | 86400      |
//! | `w`  | weeks   | 604800     |
//! | `mo` | months  | 2629746    |
//! | `y`  | years   | 31556952   |

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Mul;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, SliceError};

// ── Unit ────────────────────────────────────────────────────────────────────

/// The unit of a [`Duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl Unit {
    /// Every unit, shortest first.
    pub const ALL: [Unit; 7] = [
        Unit::Seconds,
        Unit::Minutes,
        Unit::Hours,
        Unit::Days,
        Unit::Weeks,
        Unit::Months,
        Unit::Years,
    ];

    /// Look up a unit by its period code. Case-sensitive: `"H"` is not `"h"`.
    pub fn from_code(code: &str) -> Option<Unit> {
        match code {
            "s" => Some(Unit::Seconds),
            "m" => Some(Unit::Minutes),
            "h" => Some(Unit::Hours),
            "d" => Some(Unit::Days),
            "w" => Some(Unit::Weeks),
            "mo" => Some(Unit::Months),
            "y" => Some(Unit::Years),
            _ => None,
        }
    }

    /// The period code for this unit. Months use `"mo"` so they never collide
    /// with minutes.
    pub fn code(self) -> &'static str {
        match self {
            Unit::Seconds => "s",
            Unit::Minutes => "m",
            Unit::Hours => "h",
            Unit::Days => "d",
            Unit::Weeks => "w",
            Unit::Months => "mo",
            Unit::Years => "y",
        }
    }

    /// Fixed seconds-equivalent of one unit.
    pub fn seconds(self) -> i64 {
        match self {
            Unit::Seconds => 1,
            Unit::Minutes => 60,
            Unit::Hours => 3_600,
            Unit::Days => 86_400,
            Unit::Weeks => 604_800,
            Unit::Months => 2_629_746,
            Unit::Years => 31_556_952,
        }
    }

    /// Lowercase plural English name (`"minutes"`, `"months"`).
    pub fn name(self) -> &'static str {
        match self {
            Unit::Seconds => "seconds",
            Unit::Minutes => "minutes",
            Unit::Hours => "hours",
            Unit::Days => "days",
            Unit::Weeks => "weeks",
            Unit::Months => "months",
            Unit::Years => "years",
        }
    }

    /// Whether boundaries for this unit follow the calendar rather than a
    /// fixed-seconds grid.
    pub fn is_calendar(self) -> bool {
        matches!(self, Unit::Months | Unit::Years)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Duration ────────────────────────────────────────────────────────────────

/// A positive count of one [`Unit`].
///
/// Equality, ordering, and hashing all compare the seconds-equivalent, so
/// `"60m"` equals `"1h"` while `"59m"` does not.
///
/// # Examples
///
/// ```
/// use time_slice::{Duration, Unit};
///
/// let d: Duration = "3h".parse().unwrap();
/// assert_eq!(d.unit(), Unit::Hours);
/// assert_eq!(d.period(), "3h");
/// assert_eq!(d * 2, 21_600);
/// assert_eq!(d, "180m".parse::<Duration>().unwrap());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Duration {
    value: i64,
    unit: Unit,
    delta: TimeDelta,
}

impl Duration {
    /// Parse a period string such as `"5m"` or `"1mo"`.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidDuration`] if the text contains a decimal
    /// point, is not `<digits><letters>`, names an unknown or uppercase unit,
    /// or has a zero or overflowing value.
    pub fn parse(text: &str) -> Result<Self> {
        if text.contains('.') {
            return Err(invalid(text, "fractional values are not allowed"));
        }

        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());
        let (digits, code) = text.split_at(split);

        if digits.is_empty() || code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(invalid(text, "expected <digits><unit>"));
        }

        let unit = Unit::from_code(code).ok_or_else(|| invalid(text, "unsupported unit"))?;
        let value: i64 = digits
            .parse()
            .map_err(|_| invalid(text, "value is too large"))?;

        Self::new(value, unit).map_err(|_| invalid(text, "value must be positive and in range"))
    }

    /// Build a duration from a count and a unit.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidDuration`] if `value` is not positive or
    /// the seconds-equivalent does not fit a [`TimeDelta`].
    pub fn new(value: i64, unit: Unit) -> Result<Self> {
        if value <= 0 {
            return Err(SliceError::InvalidDuration(format!(
                "value must be positive, got {value}{}",
                unit.code()
            )));
        }

        let delta = value
            .checked_mul(unit.seconds())
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                SliceError::InvalidDuration(format!("{value}{} is out of range", unit.code()))
            })?;

        Ok(Self { value, unit, delta })
    }

    /// The count of units (5 in `"5m"`).
    pub fn value(&self) -> i64 {
        self.value
    }

    /// The unit (minutes in `"5m"`).
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Canonical period string. Parsing it again yields an equal duration.
    pub fn period(&self) -> String {
        format!("{}{}", self.value, self.unit.code())
    }

    /// The seconds-equivalent used for all interval arithmetic.
    pub fn as_seconds(&self) -> i64 {
        self.delta.num_seconds()
    }

    /// The seconds-equivalent as a chrono [`TimeDelta`].
    pub fn as_chrono(&self) -> TimeDelta {
        self.delta
    }

    /// `self * n` in seconds, or `None` if it overflows `i64`.
    pub fn checked_mul(&self, n: i64) -> Option<i64> {
        self.as_seconds().checked_mul(n)
    }
}

fn invalid(text: &str, reason: &str) -> SliceError {
    trace!(text, reason, "rejected duration text");
    SliceError::InvalidDuration(format!("{reason}: '{text}'"))
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        self.as_seconds() == other.as_seconds()
    }
}

impl Eq for Duration {}

impl Hash for Duration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_seconds().hash(state);
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Duration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_seconds().cmp(&other.as_seconds())
    }
}

/// `duration * n` is a plain count of seconds, not a new duration.
///
/// Overflows like `i64` multiplication and panics in debug builds; use
/// [`Duration::checked_mul`] when `n` is unbounded.
impl Mul<i64> for Duration {
    type Output = i64;

    fn mul(self, rhs: i64) -> i64 {
        self.as_seconds() * rhs
    }
}

impl Mul<i64> for &Duration {
    type Output = i64;

    fn mul(self, rhs: i64) -> i64 {
        self.as_seconds() * rhs
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.code())
    }
}

impl FromStr for Duration {
    type Err = SliceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Duration {
    type Error = SliceError;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Duration {
    type Error = SliceError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Duration> for String {
    fn from(d: Duration) -> String {
        d.period()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
