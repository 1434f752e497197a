//! Sources of "now".
//!
//! Ranges that omit an explicit end read the current time from a [`Clock`]
//! passed in by the caller, never from ambient global state. [`SystemClock`]
//! reads `Utc::now()`; [`FixedClock`] pins an instant for deterministic tests.

use chrono::{DateTime, Utc};

/// Supplies "now" to range construction.
pub trait Clock {
    /// The current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// The operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_is_stable() {
        let at = Utc.with_ymd_and_hms(2019, 1, 6, 17, 44, 0).unwrap();
        let clock = FixedClock(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_system_clock_reads_wall_time() {
        let floor = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert!(SystemClock.now() > floor);
    }

    #[test]
    fn test_clock_through_reference() {
        fn read(clock: impl Clock) -> DateTime<Utc> {
            clock.now()
        }

        let at = Utc.with_ymd_and_hms(2020, 2, 29, 0, 0, 0).unwrap();
        let clock = FixedClock(at);
        let by_ref: &dyn Clock = &clock;
        assert_eq!(read(by_ref), at);
        assert_eq!(read(&clock), at);
    }
}
