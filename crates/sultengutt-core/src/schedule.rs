//! Weekly reminder schedule: a set of weekdays plus a daily trigger time.

use chrono::{DateTime, Datelike, TimeDelta, TimeZone, Weekday};

use crate::error::ReminderError;
use crate::pause::PauseState;
use crate::time_of_day::TimeOfDay;

/// Which weekdays the reminder fires on, and at what time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    days: Vec<Weekday>,
    time_of_day: TimeOfDay,
}

impl Schedule {
    /// Build a schedule from weekday names and a strict `HH:MM` hour.
    ///
    /// Day names are case-insensitive and may be abbreviated ("mon", "Tue").
    /// Duplicates are dropped and days are kept in Monday-first order.
    ///
    /// # Errors
    ///
    /// [`ReminderError::InvalidSchedule`] for an empty or unknown day list,
    /// [`ReminderError::InvalidTimeFormat`] for a bad hour.
    pub fn new<S: AsRef<str>>(days: &[S], hour: &str) -> Result<Self, ReminderError> {
        if days.is_empty() {
            return Err(ReminderError::InvalidSchedule("no days specified".to_string()));
        }

        let mut parsed = Vec::with_capacity(days.len());
        for day in days {
            let day = day.as_ref();
            let weekday = parse_weekday(day).ok_or_else(|| {
                ReminderError::InvalidSchedule(format!("invalid day specified: '{day}'"))
            })?;
            if !parsed.contains(&weekday) {
                parsed.push(weekday);
            }
        }
        parsed.sort_by_key(|d| d.num_days_from_monday());

        Ok(Schedule {
            days: parsed,
            time_of_day: TimeOfDay::parse_strict(hour.trim())?,
        })
    }

    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }

    /// Full English names of the scheduled days, e.g. `["Monday", "Friday"]`.
    pub fn day_names(&self) -> Vec<String> {
        self.days.iter().map(|d| weekday_name(*d).to_string()).collect()
    }

    /// The first reminder strictly after `after`.
    pub fn next_reminder<Tz: TimeZone>(
        &self,
        after: &DateTime<Tz>,
    ) -> Result<DateTime<Tz>, ReminderError> {
        let tz = after.timezone();
        let today = after.date_naive();
        // Eight days covers "same weekday next week" when today's slot has passed.
        for offset in 0..=7 {
            let Some(date) = today.checked_add_signed(TimeDelta::days(offset)) else {
                break;
            };
            if !self.days.contains(&date.weekday()) {
                continue;
            }
            let candidate = self.time_of_day.on_date(date, &tz)?;
            if candidate > *after {
                return Ok(candidate);
            }
        }
        Err(ReminderError::InvalidSchedule(
            "no upcoming reminder found".to_string(),
        ))
    }
}

/// Next reminder taking the pause state into account.
///
/// `None` while paused indefinitely. A timed pause pushes the search to its
/// resume instant; a reminder falling exactly on that instant is kept.
pub fn next_reminder_for<Tz: TimeZone>(
    schedule: &Schedule,
    pause: PauseState,
    now: &DateTime<Tz>,
) -> Result<Option<DateTime<Tz>>, ReminderError> {
    let after = match pause {
        PauseState::Indefinite => return Ok(None),
        PauseState::Until(ts) if ts > now.timestamp() => now
            .timezone()
            .timestamp_opt(ts - 1, 0)
            .single()
            .ok_or_else(|| ReminderError::InvalidSchedule(format!("invalid pause timestamp {ts}")))?,
        _ => now.clone(),
    };
    schedule.next_reminder(&after).map(Some)
}

/// Parse a weekday name (case-insensitive, supports full and abbreviated).
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.trim().to_ascii_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
