//! The timezone a schedule's wall-clock times are read in.
//!
//! Configured schedules either follow the machine's local zone or name an
//! IANA zone explicitly. [`Zone`] dispatches the generic calculations in
//! [`crate::pause`] and [`crate::schedule`] to whichever applies.

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, Utc};
use chrono_tz::Tz;

use crate::duration::ElapsedTime;
use crate::error::ReminderError;
use crate::pause::PauseState;
use crate::schedule::{next_reminder_for, Schedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// The operating system's local timezone.
    #[default]
    Local,
    /// An explicit IANA timezone.
    Named(Tz),
}

impl Zone {
    /// `None` or an empty name selects the local zone.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError::InvalidTimezone`] if the name is not a valid
    /// IANA timezone.
    pub fn parse(name: Option<&str>) -> Result<Self, ReminderError> {
        match name.map(str::trim) {
            None | Some("") => Ok(Zone::Local),
            Some(name) => name
                .parse::<Tz>()
                .map(Zone::Named)
                .map_err(|_| ReminderError::InvalidTimezone(format!("'{name}'"))),
        }
    }

    /// Pause state for a pause request made at `now`.
    pub fn pause_state(
        &self,
        elapsed: Option<ElapsedTime>,
        scheduled: &str,
        now: DateTime<Utc>,
    ) -> Result<PauseState, ReminderError> {
        match self {
            Zone::Local => PauseState::for_request(elapsed, scheduled, &now.with_timezone(&Local)),
            Zone::Named(tz) => PauseState::for_request(elapsed, scheduled, &now.with_timezone(tz)),
        }
    }

    /// Next reminder after `now` honouring `pause`, expressed in this zone.
    pub fn next_reminder(
        &self,
        schedule: &Schedule,
        pause: PauseState,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<FixedOffset>>, ReminderError> {
        let next = match self {
            Zone::Local => next_reminder_for(schedule, pause, &now.with_timezone(&Local))?
                .map(|dt| dt.fixed_offset()),
            Zone::Named(tz) => next_reminder_for(schedule, pause, &now.with_timezone(tz))?
                .map(|dt| dt.fixed_offset()),
        };
        Ok(next)
    }

    /// A Unix timestamp as a datetime in this zone.
    pub fn localize(&self, timestamp: i64) -> Option<DateTime<FixedOffset>> {
        let utc = DateTime::from_timestamp(timestamp, 0)?;
        Some(match self {
            Zone::Local => utc.with_timezone(&Local).fixed_offset(),
            Zone::Named(tz) => utc.with_timezone(tz).fixed_offset(),
        })
    }

    /// Render a Unix timestamp with a `strftime` pattern in this zone.
    pub fn format(&self, timestamp: i64, pattern: &str) -> String {
        match self.localize(timestamp) {
            Some(dt) => dt.format(pattern).to_string(),
            None => format!("@{timestamp}"),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => f.write_str("local"),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::parse_duration;
    use chrono::TimeZone;

    #[test]
    fn test_parse() {
        assert_eq!(Zone::parse(None).unwrap(), Zone::Local);
        assert_eq!(Zone::parse(Some("  ")).unwrap(), Zone::Local);
        assert_eq!(
            Zone::parse(Some("Europe/Oslo")).unwrap(),
            Zone::Named(chrono_tz::Europe::Oslo)
        );
        let err = Zone::parse(Some("Invalid/Zone")).unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_display() {
        assert_eq!(Zone::Local.to_string(), "local");
        assert_eq!(Zone::Named(chrono_tz::Asia::Tokyo).to_string(), "Asia/Tokyo");
    }

    #[test]
    fn test_pause_state_in_named_zone() {
        // 10:00 UTC is 11:00 in Oslo (CET) → next 14:30 Oslo is 13:30 UTC today.
        let zone = Zone::parse(Some("Europe/Oslo")).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let state = zone
            .pause_state(Some(parse_duration("1 day").unwrap()), "14:30", now)
            .unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 13, 30, 0).unwrap();
        assert_eq!(state, PauseState::Until(expected.timestamp()));

        assert_eq!(zone.pause_state(None, "14:30", now).unwrap(), PauseState::Indefinite);
    }

    #[test]
    fn test_format_in_named_zone() {
        let zone = Zone::Named(chrono_tz::America::New_York);
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 19, 30, 0).unwrap().timestamp();
        assert_eq!(zone.format(ts, "%A, %B %-d, %Y %H:%M"), "Tuesday, January 2, 2024 14:30");
    }

    #[test]
    fn test_next_reminder_in_named_zone() {
        let zone = Zone::Named(chrono_tz::Asia::Tokyo);
        let schedule = Schedule::new(&["Tuesday"], "09:00").unwrap();
        // Monday 2024-01-01 12:00 UTC is Monday 21:00 in Tokyo.
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let next = zone
            .next_reminder(&schedule, PauseState::NotPaused, now)
            .unwrap()
            .unwrap();
        assert_eq!(next.to_rfc3339(), "2024-01-02T09:00:00+09:00");
    }
}
