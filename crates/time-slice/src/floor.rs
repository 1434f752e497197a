//! Flooring timestamps onto a duration's boundary grid.
//!
//! Two grids exist, and they are deliberately different:
//!
//! - **Fixed units** (seconds through weeks) use a grid anchored at the Unix
//!   epoch and stepped by the duration's exact length in seconds. One side
//!   effect: `"1w"` boundaries fall on Thursdays, because 1970-01-01 was one.
//! - **Calendar units** (months, years) floor to the first instant of the
//!   month or year, stepped by the duration's count from January 1970. They
//!   never consult the average-seconds approximation that interval arithmetic
//!   uses elsewhere.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::duration::{Duration, Unit};

const EPOCH_YEAR: i64 = 1970;

/// Round `at` down to the nearest boundary of `duration` at or before it.
///
/// Returns `None` only if the boundary falls outside chrono's representable
/// range.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use time_slice::{floor_to, Duration};
///
/// let at = Utc.with_ymd_and_hms(2019, 1, 6, 17, 44, 0).unwrap();
/// let two_hours = Duration::parse("2h").unwrap();
/// assert_eq!(
///     floor_to(at, &two_hours),
///     Some(Utc.with_ymd_and_hms(2019, 1, 6, 16, 0, 0).unwrap())
/// );
///
/// let month = Duration::parse("1mo").unwrap();
/// assert_eq!(
///     floor_to(at, &month),
///     Some(Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap())
/// );
/// ```
pub fn floor_to(at: DateTime<Utc>, duration: &Duration) -> Option<DateTime<Utc>> {
    match duration.unit() {
        Unit::Months => floor_to_months(at, duration.value()),
        Unit::Years => floor_to_years(at, duration.value()),
        _ => floor_to_seconds(at, duration.as_seconds()),
    }
}

fn floor_to_seconds(at: DateTime<Utc>, step: i64) -> Option<DateTime<Utc>> {
    // `timestamp()` already drops sub-second precision toward negative infinity.
    let secs = at.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(step), 0)
}

fn floor_to_months(at: DateTime<Utc>, step: i64) -> Option<DateTime<Utc>> {
    let index = (at.year() as i64 - EPOCH_YEAR) * 12 + at.month0() as i64;
    let floored = index - index.rem_euclid(step);
    let year = i32::try_from(EPOCH_YEAR + floored.div_euclid(12)).ok()?;
    let month = floored.rem_euclid(12) as u32 + 1;
    start_of(year, month)
}

fn floor_to_years(at: DateTime<Utc>, step: i64) -> Option<DateTime<Utc>> {
    let offset = at.year() as i64 - EPOCH_YEAR;
    let year = i32::try_from(EPOCH_YEAR + offset - offset.rem_euclid(step)).ok()?;
    start_of(year, 1)
}

/// Midnight UTC on the first day of the given month.
fn start_of(year: i32, month: u32) -> Option<DateTime<Utc>> {
    let naive = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
    Some(naive.and_utc())
}
