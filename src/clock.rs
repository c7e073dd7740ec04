//! The source of the current time for timestamps and the budget month.

use std::fmt::Debug;

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Provides the current date and time.
pub trait Clock: Debug + Send + Sync {
    /// The current date and time.
    fn now(&self) -> OffsetDateTime;

    /// The current calendar date.
    fn today(&self) -> Date {
        self.now().date()
    }
}

/// Reads the wall clock and shifts it into a local timezone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    local_timezone: String,
}

impl SystemClock {
    /// Create a clock for `local_timezone`, a canonical timezone name such as
    /// "Pacific/Auckland".
    ///
    /// Returns `None` if the timezone is not known.
    pub fn new(local_timezone: &str) -> Option<Self> {
        get_local_offset(local_timezone)?;

        Some(Self {
            local_timezone: local_timezone.to_owned(),
        })
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();

        // The name was checked in `new`, the lookup only fails for unknown names.
        match get_local_offset(&self.local_timezone) {
            Some(offset) => now.to_offset(offset),
            None => now,
        }
    }
}

/// A clock that is stuck at one point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Get the current UTC offset of a canonical timezone, e.g. "Etc/UTC".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The `YYYY-MM` key of the month that `date` falls in.
pub fn month_key(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}
