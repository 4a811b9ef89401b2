//! Daily trigger times (`"HH:MM"`).
//!
//! Two parsers are provided. [`TimeOfDay::parse`] is permissive: it only
//! requires two colon-separated integers and leaves range handling to the
//! calendar arithmetic, so `"25:00"` means 01:00 on the following day.
//! [`TimeOfDay::parse_strict`] enforces a 24-hour clock and is what
//! configuration validation uses.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone};

use crate::error::ReminderError;

/// An hour/minute pair. Components are not range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeOfDay {
    pub hour: i64,
    pub minute: i64,
}

impl TimeOfDay {
    pub fn new(hour: i64, minute: i64) -> Self {
        TimeOfDay { hour, minute }
    }

    /// Parse `"H:MM"`-like input without range validation.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError::InvalidTimeFormat`] unless the input splits on
    /// `':'` into exactly two integer parts.
    pub fn parse(s: &str) -> Result<Self, ReminderError> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            return Err(ReminderError::InvalidTimeFormat(format!("'{s}'")));
        }

        let hour = parts[0].parse::<i64>().map_err(|_| {
            ReminderError::InvalidTimeFormat(format!("invalid hour '{}' in '{s}'", parts[0]))
        })?;
        let minute = parts[1].parse::<i64>().map_err(|_| {
            ReminderError::InvalidTimeFormat(format!("invalid minute '{}' in '{s}'", parts[1]))
        })?;

        Ok(TimeOfDay { hour, minute })
    }

    /// Parse a 24-hour `H:MM` / `HH:MM` time: hour 0-23, minute exactly two
    /// digits 00-59.
    pub fn parse_strict(s: &str) -> Result<Self, ReminderError> {
        let invalid = || ReminderError::InvalidTimeFormat(format!("'{s}' is not a 24-hour HH:MM time"));

        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(h) || h.len() > 2 || !all_digits(m) || m.len() != 2 {
            return Err(invalid());
        }

        let hour: i64 = h.parse().map_err(|_| invalid())?;
        let minute: i64 = m.parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok(TimeOfDay { hour, minute })
    }

    /// Offset of this time from midnight. Out-of-range components simply
    /// produce offsets beyond (or before) the day.
    pub fn offset_from_midnight(&self) -> Result<TimeDelta, ReminderError> {
        TimeDelta::try_hours(self.hour)
            .zip(TimeDelta::try_minutes(self.minute))
            .and_then(|(h, m)| h.checked_add(&m))
            .ok_or_else(|| ReminderError::InvalidTimeFormat(format!("'{self}' is out of range")))
    }

    /// This wall-clock time on `date`, in zone `tz`.
    ///
    /// Hours and minutes overflow into neighbouring days. When the local time
    /// is ambiguous (DST fall-back) the earlier instant wins; when it does not
    /// exist (DST spring-forward) it is shifted forward by the gap.
    pub fn on_date<Tz: TimeZone>(
        &self,
        date: NaiveDate,
        tz: &Tz,
    ) -> Result<DateTime<Tz>, ReminderError> {
        let naive = date
            .and_time(NaiveTime::default())
            .checked_add_signed(self.offset_from_midnight()?)
            .ok_or_else(|| ReminderError::InvalidTimeFormat(format!("'{self}' is out of range")))?;
        resolve_local(tz, &naive)
            .ok_or_else(|| ReminderError::InvalidTimeFormat(format!("'{self}' is out of range")))
    }
}

impl FromStr for TimeOfDay {
    type Err = ReminderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeOfDay::parse(s)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Map a local wall-clock time to an instant in `tz`.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    if let Some(dt) = tz.from_local_datetime(naive).earliest() {
        return Some(dt);
    }
    // Inside a DST gap: read the wall clock with the offset in force before
    // the transition, which lands the same distance past it. A day earlier is
    // before the transition in every zone, east or west of UTC.
    let before = naive.checked_sub_signed(TimeDelta::days(1))?;
    let offset = tz.offset_from_utc_datetime(&before).fix().local_minus_utc();
    let utc = naive.checked_sub_signed(TimeDelta::seconds(i64::from(offset)))?;
    Some(tz.from_utc_datetime(&utc))
}
