//! Calendar clock.
//!
//! Simulated time is a calendar date.  It never advances on its own: the
//! simulator jumps it forward to the next exit date when the carrier is idle
//! and residents remain.  Wall-clock drift between steps is not modelled.

use std::fmt;

use chrono::NaiveDate;

use crate::{CoreError, CoreResult};

/// Date formats accepted by [`parse_date`], tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];

/// Parse `2017/9/1` or `2017-09-01`.
pub fn parse_date(s: &str) -> CoreResult<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| CoreError::Parse(format!("invalid date {s:?}: expected YYYY/M/D")))
}

/// The simulation's current date.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YardClock {
    current: NaiveDate,
    /// Number of forward jumps taken so far.
    jumps:   u32,
}

impl YardClock {
    pub fn new(start: NaiveDate) -> Self {
        Self { current: start, jumps: 0 }
    }

    #[inline]
    pub fn now(&self) -> NaiveDate {
        self.current
    }

    pub fn jumps(&self) -> u32 {
        self.jumps
    }

    /// Move the clock to `date` if it lies in the future.
    ///
    /// Returns `true` if the clock moved.  The clock never runs backwards.
    pub fn advance_to(&mut self, date: NaiveDate) -> bool {
        if date > self.current {
            self.current = date;
            self.jumps += 1;
            true
        } else {
            false
        }
    }
}

impl fmt::Display for YardClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.current.format("%Y/%m/%d"))
    }
}
