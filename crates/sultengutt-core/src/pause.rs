//! Pause/resume computation.
//!
//! A pause never ends at an arbitrary wall-clock offset: the resume instant is
//! always aligned to the daily trigger time. The calculation is
//!
//! 1. find the next occurrence of the trigger time strictly after `now`
//!    (an occurrence exactly at `now` counts as already passed),
//! 2. add the elapsed quantity to it,
//! 3. replace the time of day of the result with the trigger time, keeping
//!    the calendar date the sum landed on.
//!
//! Step 3 means sub-day pauses usually collapse onto the next trigger: with
//! a 14:30 trigger, pausing "2 hours" at 10:00 resumes at 14:30 the same
//! day, exactly like an instant pause would. Only when the sum crosses
//! midnight does a short pause skip a day.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::duration::ElapsedTime;
use crate::error::ReminderError;
use crate::time_of_day::TimeOfDay;

/// Sentinel persisted for "not paused".
pub const NOT_PAUSED: i64 = -1;
/// Sentinel persisted for "paused with no scheduled resume".
pub const PAUSED_INDEFINITELY: i64 = 0;

/// The next occurrence of `time_of_day` strictly after `now`, in `now`'s zone.
///
/// Builds the trigger on `now`'s calendar date; if that is not after `now`
/// it moves to the following calendar date. Outside DST transitions this is
/// the same as adding 24 hours; across one the wall-clock time is kept.
pub fn next_occurrence<Tz: TimeZone>(
    time_of_day: &TimeOfDay,
    now: &DateTime<Tz>,
) -> Result<DateTime<Tz>, ReminderError> {
    let tz = now.timezone();
    let today = now.date_naive();
    let candidate = time_of_day.on_date(today, &tz)?;
    if candidate > *now {
        return Ok(candidate);
    }
    let tomorrow = today.succ_opt().ok_or_else(|| {
        ReminderError::InvalidTimeFormat(format!("'{time_of_day}' is out of range"))
    })?;
    time_of_day.on_date(tomorrow, &tz)
}

/// Compute when a pause of `elapsed` requested at `now` should end.
///
/// `scheduled` is the daily trigger time as `"HH:MM"`. The result always
/// carries the trigger time of day; see the module docs for how the elapsed
/// quantity maps onto calendar days.
///
/// # Errors
///
/// Returns [`ReminderError::InvalidTimeFormat`] if `scheduled` is not two
/// colon-separated integers, and [`ReminderError::InvalidDurationFormat`] if
/// `elapsed` pushes the date past the representable range.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use sultengutt_core::duration::parse_duration;
/// use sultengutt_core::pause::calculate_pause_until;
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
/// let resume = calculate_pause_until(parse_duration("1 day").unwrap(), "09:00", &now).unwrap();
/// assert_eq!(resume, Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap());
/// ```
pub fn calculate_pause_until<Tz: TimeZone>(
    elapsed: ElapsedTime,
    scheduled: &str,
    now: &DateTime<Tz>,
) -> Result<DateTime<Tz>, ReminderError> {
    let time_of_day = TimeOfDay::parse(scheduled)?;
    let next = next_occurrence(&time_of_day, now)?;

    let raw = next
        .checked_add_signed(elapsed.as_time_delta())
        .ok_or_else(|| {
            ReminderError::InvalidDurationFormat(format!("pause of {elapsed} is too long"))
        })?;

    time_of_day.on_date(raw.date_naive(), &raw.timezone())
}

/// [`calculate_pause_until`] as Unix seconds, the form that gets persisted.
pub fn calculate_pause_until_timestamp<Tz: TimeZone>(
    elapsed: ElapsedTime,
    scheduled: &str,
    now: &DateTime<Tz>,
) -> Result<i64, ReminderError> {
    calculate_pause_until(elapsed, scheduled, now).map(|dt| dt.timestamp())
}

/// Whether reminders are running, paused without end, or paused until an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum PauseState {
    #[default]
    NotPaused,
    Indefinite,
    /// Paused until this Unix timestamp (seconds).
    Until(i64),
}

/// What a reminder run should do given the pause state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Show the reminder.
    Fire,
    /// The pause has run out: clear it, then show the reminder.
    ResumeAndFire,
    /// Stay quiet.
    Suppress,
}

impl PauseState {
    /// Decode the persisted sentinel. Negative values other than `-1` are
    /// treated as not paused.
    pub fn from_sentinel(value: i64) -> Self {
        match value {
            PAUSED_INDEFINITELY => PauseState::Indefinite,
            v if v > 0 => PauseState::Until(v),
            _ => PauseState::NotPaused,
        }
    }

    pub fn sentinel(&self) -> i64 {
        match self {
            PauseState::NotPaused => NOT_PAUSED,
            PauseState::Indefinite => PAUSED_INDEFINITELY,
            PauseState::Until(ts) => *ts,
        }
    }

    /// State for a pause request. `None` pauses indefinitely; otherwise the
    /// resume instant comes from [`calculate_pause_until`].
    pub fn for_request<Tz: TimeZone>(
        elapsed: Option<ElapsedTime>,
        scheduled: &str,
        now: &DateTime<Tz>,
    ) -> Result<Self, ReminderError> {
        match elapsed {
            None => Ok(PauseState::Indefinite),
            Some(e) => calculate_pause_until_timestamp(e, scheduled, now).map(PauseState::Until),
        }
    }

    pub fn is_paused(&self) -> bool {
        !matches!(self, PauseState::NotPaused)
    }

    /// True while the pause keeps reminders quiet at `now` (Unix seconds).
    pub fn is_suppressing(&self, now: i64) -> bool {
        match self {
            PauseState::NotPaused => false,
            PauseState::Indefinite => true,
            PauseState::Until(ts) => now < *ts,
        }
    }

    /// True once a timed pause has reached its resume instant.
    pub fn has_expired(&self, now: i64) -> bool {
        matches!(self, PauseState::Until(ts) if now >= *ts)
    }

    /// Decide what a reminder run at `now` (Unix seconds) should do.
    pub fn gate(&self, now: i64) -> Gate {
        if self.is_suppressing(now) {
            Gate::Suppress
        } else if self.has_expired(now) {
            Gate::ResumeAndFire
        } else {
            Gate::Fire
        }
    }
}

impl From<i64> for PauseState {
    fn from(value: i64) -> Self {
        PauseState::from_sentinel(value)
    }
}

impl From<PauseState> for i64 {
    fn from(state: PauseState) -> Self {
        state.sentinel()
    }
}
