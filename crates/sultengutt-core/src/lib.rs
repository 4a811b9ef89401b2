//! # sultengutt-core
//!
//! Deterministic scheduling logic for a recurring reminder that can be
//! paused and resumed.
//!
//! Everything here is a pure function of its arguments: the current instant
//! is always passed in (see [`clock`]) and nothing touches the filesystem,
//! so the same inputs give the same answer on every machine.
//!
//! ## Modules
//!
//! - [`duration`] — `"2 weeks"` → [`ElapsedTime`]
//! - [`time_of_day`] — `"14:30"` → [`TimeOfDay`], permissive and strict parsing
//! - [`pause`] — trigger-aligned resume instants and the three-state [`PauseState`]
//! - [`schedule`] — weekday schedules and next-reminder lookup
//! - [`zone`] — local or IANA timezone dispatch
//! - [`clock`] — injectable "now"
//! - [`error`] — Error types

pub mod clock;
pub mod duration;
pub mod error;
pub mod pause;
pub mod schedule;
pub mod time_of_day;
pub mod zone;

pub use clock::{Clock, FixedClock, SystemClock};
pub use duration::{parse_duration, parse_duration_tokens, ElapsedTime};
pub use error::ReminderError;
pub use pause::{
    calculate_pause_until, calculate_pause_until_timestamp, next_occurrence, Gate, PauseState,
    NOT_PAUSED, PAUSED_INDEFINITELY,
};
pub use schedule::{next_reminder_for, parse_weekday, weekday_name, Schedule};
pub use time_of_day::TimeOfDay;
pub use zone::Zone;
