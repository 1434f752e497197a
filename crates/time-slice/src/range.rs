//! A span of time divided into equal, contiguous, boundary-aligned slices.
//!
//! A [`SliceRange`] owns a [`Duration`] and an inclusive `[from, to]` pair of
//! boundaries. Both boundaries are floored onto the duration's grid (see
//! [`floor_to`]), and `to` is always the *start* of the last slice, never its
//! end. Slice `i` covers `[from + i*d, from + (i+1)*d]`, where `d` is the
//! duration's seconds-equivalent; neighbouring slices share a timestamp.
//!
//! # Boundary Options
//!
//! Exactly one of these combinations must be supplied in [`RangeOptions`]:
//!
//! | options          | `from`                       | `to`                         |
//! |------------------|------------------------------|------------------------------|
//! | `from` + `to`    | floor(from)                  | floor(to)                    |
//! | `from` + `length`| floor(from)                  | from + (length-1)·d          |
//! | `to` + `length`  | to − (length-1)·d            | floor(to)                    |
//! | `length`         | to − (length-1)·d            | floor(now)                   |
//! | `from`           | floor(from)                  | floor(now)                   |
//!
//! "now" comes from the [`Clock`] handed to [`SliceRange::with_clock`].
//!
//! # Lookups Never Fail
//!
//! Index and timestamp lookups that fall outside the range return `None`.
//! Only malformed construction input (period text, option combinations,
//! timestamp text) produces a [`SliceError`].

use std::iter::FusedIterator;
use std::ops::RangeInclusive;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::duration::Duration;
use crate::error::{Result, SliceError};
use crate::floor::floor_to;
use crate::timestamp::TimeArg;

// ── Slice ───────────────────────────────────────────────────────────────────

/// One interval of a [`SliceRange`]: its start and start-plus-duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slice {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slice {
    /// Whether `at` falls in `[start, end)`.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

impl From<Slice> for (DateTime<Utc>, DateTime<Utc>) {
    fn from(slice: Slice) -> Self {
        (slice.start, slice.end)
    }
}

// ── Options ─────────────────────────────────────────────────────────────────

/// A slice count: an integer or text holding one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LengthArg {
    Count(i64),
    Text(String),
}

impl LengthArg {
    /// Resolve to a positive count.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidOptions`] for non-numeric text or a
    /// count below one.
    pub fn resolve(&self) -> Result<i64> {
        let count = match self {
            LengthArg::Count(n) => *n,
            LengthArg::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                SliceError::InvalidOptions(format!("length must be an integer: '{s}'"))
            })?,
        };
        if count < 1 {
            return Err(SliceError::InvalidOptions(format!(
                "length must be at least 1, got {count}"
            )));
        }
        Ok(count)
    }
}

impl From<i64> for LengthArg {
    fn from(n: i64) -> Self {
        LengthArg::Count(n)
    }
}

impl From<i32> for LengthArg {
    fn from(n: i32) -> Self {
        LengthArg::Count(n.into())
    }
}

impl From<u32> for LengthArg {
    fn from(n: u32) -> Self {
        LengthArg::Count(n.into())
    }
}

impl From<usize> for LengthArg {
    fn from(n: usize) -> Self {
        LengthArg::Count(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for LengthArg {
    fn from(s: &str) -> Self {
        LengthArg::Text(s.to_string())
    }
}

impl From<String> for LengthArg {
    fn from(s: String) -> Self {
        LengthArg::Text(s)
    }
}

/// Boundary hints for [`SliceRange`] construction.
///
/// # Examples
///
/// ```
/// use time_slice::RangeOptions;
///
/// let options = RangeOptions::new()
///     .from("2019-01-06 12:00")
///     .to("2019-01-06 15:00");
/// assert!(options.length.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeOptions {
    pub from: Option<TimeArg>,
    pub to: Option<TimeArg>,
    pub length: Option<LengthArg>,
}

impl RangeOptions {
    /// Empty options; add a valid combination before building.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start, floored onto the duration's grid.
    pub fn from(mut self, at: impl Into<TimeArg>) -> Self {
        self.from = Some(at.into());
        self
    }

    /// Set the end, floored to become the start of the last slice.
    pub fn to(mut self, at: impl Into<TimeArg>) -> Self {
        self.to = Some(at.into());
        self
    }

    /// Set the number of slices.
    pub fn length(mut self, n: impl Into<LengthArg>) -> Self {
        self.length = Some(n.into());
        self
    }

    /// Names of the supplied options, for error messages.
    fn describe(&self) -> String {
        let given: Vec<&str> = [
            ("from", self.from.is_some()),
            ("to", self.to.is_some()),
            ("length", self.length.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect();

        if given.is_empty() {
            "none".to_string()
        } else {
            given.join(" + ")
        }
    }
}

// ── SliceRange ──────────────────────────────────────────────────────────────

/// A time span partitioned into equal slices of one [`Duration`].
///
/// Immutable once built. [`previous`](SliceRange::previous) returns a new,
/// independent range.
///
/// # Examples
///
/// ```
/// use time_slice::{RangeOptions, SliceRange};
///
/// let range = SliceRange::new(
///     "1h",
///     RangeOptions::new()
///         .from("2019-01-06T12:00:00Z")
///         .to("2019-01-06T15:00:00Z"),
/// )
/// .unwrap();
///
/// assert_eq!(range.len(), 4);
/// assert_eq!(range.index_of("2019-01-06 14:30:00").unwrap(), Some(2));
/// assert_eq!(range.iter().count(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SliceRange {
    duration: Duration,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl SliceRange {
    /// Build a range, reading "now" from the system clock when needed.
    ///
    /// # Errors
    ///
    /// See [`with_clock`](SliceRange::with_clock).
    pub fn new(period: &str, options: RangeOptions) -> Result<Self> {
        Self::with_clock(period, options, SystemClock)
    }

    /// Build a range, reading "now" from `clock` when `options` leave the end
    /// open.
    ///
    /// # Errors
    ///
    /// - [`SliceError::InvalidDuration`] if `period` is malformed.
    /// - [`SliceError::InvalidDatetime`] if a boundary string cannot be parsed.
    /// - [`SliceError::InvalidOptions`] for an unsupported option combination,
    ///   a non-positive length, or a start that resolves after the end.
    pub fn with_clock(period: &str, options: RangeOptions, clock: impl Clock) -> Result<Self> {
        let duration = Duration::parse(period)?;
        Self::resolve(duration, &options, &clock)
    }

    fn resolve(duration: Duration, options: &RangeOptions, clock: &impl Clock) -> Result<Self> {
        let floor = |at: DateTime<Utc>| {
            floor_to(at, &duration).ok_or_else(|| {
                SliceError::InvalidDatetime(format!("{at} cannot be floored to {duration}"))
            })
        };

        let (from, to) = match (&options.from, &options.to, &options.length) {
            (Some(from), Some(to), None) => (floor(from.resolve()?)?, floor(to.resolve()?)?),
            (Some(from), None, Some(length)) => {
                let from = floor(from.resolve()?)?;
                (from, step(from, &duration, length.resolve()? - 1)?)
            }
            (None, Some(to), Some(length)) => {
                let to = floor(to.resolve()?)?;
                (step(to, &duration, 1 - length.resolve()?)?, to)
            }
            (None, None, Some(length)) => {
                let to = floor(clock.now())?;
                (step(to, &duration, 1 - length.resolve()?)?, to)
            }
            (Some(from), None, None) => (floor(from.resolve()?)?, floor(clock.now())?),
            _ => {
                return Err(SliceError::InvalidOptions(format!(
                    "expected from + to, from + length, to + length, length, or from; got {}",
                    options.describe()
                )));
            }
        };

        if from > to {
            return Err(SliceError::InvalidOptions(format!(
                "start {} is after end {}",
                from.to_rfc3339(),
                to.to_rfc3339()
            )));
        }

        // Every slice end up to `to + d` must be representable.
        if to.checked_add_signed(duration.as_chrono()).is_none() {
            return Err(SliceError::InvalidOptions(format!(
                "last slice starting {} ends beyond representable time",
                to.to_rfc3339()
            )));
        }

        let range = Self { duration, from, to };
        debug!(
            period = %duration,
            options = %options.describe(),
            from = %from.to_rfc3339(),
            to = %to.to_rfc3339(),
            length = range.len(),
            "resolved slice range"
        );
        Ok(range)
    }

    /// The length of each slice.
    pub fn duration(&self) -> &Duration {
        &self.duration
    }

    /// The duration's period string (`"5m"`).
    pub fn period(&self) -> String {
        self.duration.period()
    }

    /// Start of the first slice.
    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    /// Start of the last slice.
    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }

    /// `from..=to`, the starts of the first and last slices.
    pub fn range(&self) -> RangeInclusive<DateTime<Utc>> {
        self.from..=self.to
    }

    /// Number of slices: `floor((to - from) / d) + 1`.
    pub fn len(&self) -> usize {
        let span = self.to.timestamp() - self.from.timestamp();
        (span.div_euclid(self.duration.as_seconds()) + 1) as usize
    }

    /// Always `false`: a range holds at least the slice starting at `to`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The slice at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<Slice> {
        if index >= self.len() {
            return None;
        }
        let offset = self
            .duration
            .as_seconds()
            .checked_mul(i64::try_from(index).ok()?)
            .and_then(TimeDelta::try_seconds)?;
        let start = self.from.checked_add_signed(offset)?;
        let end = start.checked_add_signed(self.duration.as_chrono())?;
        Some(Slice { start, end })
    }

    /// The slice starting at `from`.
    pub fn first(&self) -> Option<Slice> {
        self.get(0)
    }

    /// The slice starting at `to`.
    pub fn last(&self) -> Option<Slice> {
        self.get(self.len() - 1)
    }

    /// Index of the slice containing `at`, or `None` outside the range.
    ///
    /// The end of the last slice (one full duration past `to`) is outside.
    pub fn position(&self, at: DateTime<Utc>) -> Option<usize> {
        let offset = at.timestamp() - self.from.timestamp();
        let index = offset.div_euclid(self.duration.as_seconds());
        usize::try_from(index).ok().filter(|&i| i < self.len())
    }

    /// Like [`position`](SliceRange::position), resolving text first.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidDatetime`] if `at` is unparseable text. A
    /// timestamp outside the range is `Ok(None)`.
    pub fn index_of(&self, at: impl Into<TimeArg>) -> Result<Option<usize>> {
        Ok(self.position(at.into().resolve()?))
    }

    /// Whether `at` falls in `[from, to + d)`.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.position(at).is_some()
    }

    /// Lazily iterate every slice in ascending order.
    pub fn iter(&self) -> Slices<'_> {
        Slices {
            range: self,
            front: 0,
            back: self.len(),
        }
    }

    /// Slices `[start, start + count)`, silently clipped to the range.
    pub fn slice(&self, start: usize, count: usize) -> Vec<Slice> {
        let len = self.len();
        let front = start.min(len);
        let back = start.saturating_add(count).min(len);
        Slices {
            range: self,
            front,
            back,
        }
        .collect()
    }

    /// The `n` slices ending one duration before `at`.
    ///
    /// Builds a fresh range with the same period, `to = at - d` (floored), and
    /// `length = n`. For calendar units the subtraction uses the average
    /// month/year length before flooring, so the result is not always the `n`
    /// calendar periods immediately preceding `at`.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidDatetime`] for unparseable text and
    /// [`SliceError::InvalidOptions`] when `n` is zero.
    pub fn previous(&self, at: impl Into<TimeArg>, n: usize) -> Result<SliceRange> {
        let at = at.into().resolve()?;
        let anchor = at
            .checked_sub_signed(self.duration.as_chrono())
            .ok_or_else(|| {
                SliceError::InvalidOptions(format!("{at} minus {} underflows", self.duration))
            })?;

        debug!(
            period = %self.duration,
            at = %at.to_rfc3339(),
            n,
            "deriving previous slice range"
        );
        let options = RangeOptions::new().to(anchor).length(n);
        Self::resolve(self.duration, &options, &SystemClock)
    }
}

/// Move `at` by `steps` whole durations using the seconds-equivalent.
fn step(at: DateTime<Utc>, duration: &Duration, steps: i64) -> Result<DateTime<Utc>> {
    duration
        .as_seconds()
        .checked_mul(steps)
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| at.checked_add_signed(delta))
        .ok_or_else(|| {
            SliceError::InvalidOptions(format!(
                "{steps} x {duration} from {} is out of range",
                at.to_rfc3339()
            ))
        })
}

impl<'a> IntoIterator for &'a SliceRange {
    type Item = Slice;
    type IntoIter = Slices<'a>;

    fn into_iter(self) -> Slices<'a> {
        self.iter()
    }
}

// ── Slices iterator ─────────────────────────────────────────────────────────

/// Lazy iterator over the slices of a [`SliceRange`].
///
/// Computes each slice on demand. Cloning restarts from the clone point
/// without touching the range.
#[derive(Debug, Clone)]
pub struct Slices<'a> {
    range: &'a SliceRange,
    front: usize,
    back: usize,
}

impl Iterator for Slices<'_> {
    type Item = Slice;

    fn next(&mut self) -> Option<Slice> {
        if self.front >= self.back {
            return None;
        }
        let slice = self.range.get(self.front);
        self.front += 1;
        slice
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back.saturating_sub(self.front);
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Slice> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl DoubleEndedIterator for Slices<'_> {
    fn next_back(&mut self) -> Option<Slice> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.range.get(self.back)
    }
}

impl ExactSizeIterator for Slices<'_> {}

impl FusedIterator for Slices<'_> {}

// ── Tests ───────────────────────────────────────────────────────────────────
