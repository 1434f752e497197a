//! # time-slice
//!
//! Partition a span of time into equal, contiguous, boundary-aligned slices.
//!
//! Give a period string (`"5m"`, `"2h"`, `"1mo"`) and some combination of
//! start, end, and slice count; get back a [`SliceRange`] that supports random
//! access, lookup by timestamp, sub-slicing, and deriving the slices that
//! precede a reference point. Everything is a pure function of its inputs:
//! "now" is read from an injected [`Clock`], never from global state.
//!
//! ## Modules
//!
//! - [`duration`] — period string → typed, comparable [`Duration`]
//! - [`floor`] — round timestamps down onto a duration's boundary grid
//! - [`range`] — [`SliceRange`] construction, indexing, iteration, `previous`
//! - [`timestamp`] — resolve textual timestamps into `DateTime<Utc>`
//! - [`clock`] — the "current time" abstraction
//! - [`error`] — Error types

pub mod clock;
pub mod duration;
pub mod error;
pub mod floor;
pub mod range;
pub mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use duration::{Duration, Unit};
pub use error::SliceError;
pub use floor::floor_to;
pub use range::{LengthArg, RangeOptions, Slice, SliceRange, Slices};
pub use timestamp::{parse_timestamp, TimeArg};
