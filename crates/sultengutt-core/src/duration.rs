//! Human-entered pause durations.
//!
//! Parses expressions like `"30 minutes"`, `"2h"`, `"1 day"` or `"4 weeks"`
//! into an [`ElapsedTime`]. The grammar is a single amount followed by a
//! single unit:
//!
//! ```text
//! <amount> <unit>
//! amount := ASCII digits (no sign, no decimal point)
//! unit   := m | min | minute | h | hr | hour | d | day | week | month
//!           (case-insensitive, one trailing "s" allowed on the word forms)
//! ```
//!
//! Months are a fixed 30 days. There is no calendar-month arithmetic here.

use std::fmt;

use chrono::TimeDelta;

use crate::error::ReminderError;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_WEEK: u64 = 7 * SECS_PER_DAY;
const SECS_PER_MONTH: u64 = 30 * SECS_PER_DAY;

/// Largest quantity representable as a `chrono::TimeDelta` (millisecond precision).
const MAX_SECS: u64 = (i64::MAX / 1_000) as u64;

/// A non-negative span of time, normalized to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ElapsedTime {
    secs: u64,
}

impl ElapsedTime {
    /// No elapsed time at all.
    pub const ZERO: ElapsedTime = ElapsedTime { secs: 0 };

    /// Build a quantity from raw seconds. Returns `None` beyond the range
    /// date arithmetic can handle.
    pub fn try_from_secs(secs: u64) -> Option<Self> {
        (secs <= MAX_SECS).then_some(ElapsedTime { secs })
    }

    /// Total length in seconds.
    pub fn as_secs(&self) -> u64 {
        self.secs
    }

    /// The same span as a `chrono::TimeDelta`.
    pub fn as_time_delta(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.secs as i64).unwrap_or(TimeDelta::MAX)
    }

    pub fn is_zero(&self) -> bool {
        self.secs == 0
    }
}

impl fmt::Display for ElapsedTime {
    /// Renders e.g. `"2 days, 3 hours, 15 minutes"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.secs / SECS_PER_DAY;
        let hours = (self.secs % SECS_PER_DAY) / SECS_PER_HOUR;
        let minutes = (self.secs % SECS_PER_HOUR) / SECS_PER_MINUTE;
        let seconds = self.secs % SECS_PER_MINUTE;

        let mut parts = Vec::new();
        for (n, unit) in [
            (days, "day"),
            (hours, "hour"),
            (minutes, "minute"),
            (seconds, "second"),
        ] {
            if n > 0 {
                parts.push(format!("{} {}{}", n, unit, if n == 1 { "" } else { "s" }));
            }
        }
        if parts.is_empty() {
            return f.write_str("0 minutes");
        }
        f.write_str(&parts.join(", "))
    }
}

/// Parse a duration expression such as `"2 weeks"` or `"30m"`.
///
/// Leading, trailing and interior whitespace is tolerated; the whitespace
/// between amount and unit may also be absent.
///
/// # Errors
///
/// Returns [`ReminderError::InvalidDurationFormat`] for empty input, a
/// missing or signed/non-numeric amount, a missing or unknown unit, extra
/// tokens, or a quantity too large to represent.
///
/// # Examples
///
/// ```
/// use sultengutt_core::duration::parse_duration;
///
/// assert_eq!(parse_duration("2 hours").unwrap().as_secs(), 7_200);
/// assert_eq!(parse_duration("1 day").unwrap(), parse_duration("1 days").unwrap());
/// assert!(parse_duration("5 years").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<ElapsedTime, ReminderError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ReminderError::InvalidDurationFormat(
            "empty duration".to_string(),
        ));
    }

    let digits_end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if digits_end == 0 {
        return Err(ReminderError::InvalidDurationFormat(format!(
            "expected a whole number before the unit in '{s}'"
        )));
    }

    let (amount_str, rest) = s.split_at(digits_end);
    let amount: u64 = amount_str.parse().map_err(|_| {
        ReminderError::InvalidDurationFormat(format!("number too large in '{s}'"))
    })?;

    let unit = rest.trim_start();
    if unit.is_empty() {
        return Err(ReminderError::InvalidDurationFormat(format!(
            "missing unit in '{s}'"
        )));
    }
    if unit.contains(char::is_whitespace) {
        return Err(ReminderError::InvalidDurationFormat(format!(
            "expected '<amount> <unit>', got '{s}'"
        )));
    }

    let multiplier = unit_to_seconds(unit).ok_or_else(|| {
        ReminderError::InvalidDurationFormat(format!(
            "unsupported time unit '{unit}' (use minutes, hours, days, weeks or months)"
        ))
    })?;

    amount
        .checked_mul(multiplier)
        .and_then(ElapsedTime::try_from_secs)
        .ok_or_else(|| ReminderError::InvalidDurationFormat(format!("duration too large: '{s}'")))
}

/// Parse a duration that arrives already split into words, e.g. the
/// trailing arguments of `pause 1 day`.
///
/// The tokens are joined with single spaces and handed to [`parse_duration`].
pub fn parse_duration_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<ElapsedTime, ReminderError> {
    if tokens.is_empty() {
        return Err(ReminderError::InvalidDurationFormat(
            "no duration given".to_string(),
        ));
    }
    let joined = tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    parse_duration(&joined)
}

/// Seconds per unit, or `None` for an unknown spelling.
fn unit_to_seconds(unit: &str) -> Option<u64> {
    let unit = unit.to_ascii_lowercase();
    // Single-letter abbreviations never take a plural "s" ("ms" is not minutes).
    match unit.as_str() {
        "m" => return Some(SECS_PER_MINUTE),
        "h" => return Some(SECS_PER_HOUR),
        "d" => return Some(SECS_PER_DAY),
        _ => {}
    }
    let singular = unit.strip_suffix('s').unwrap_or(&unit);
    match singular {
        "min" | "minute" => Some(SECS_PER_MINUTE),
        "hr" | "hour" => Some(SECS_PER_HOUR),
        "day" => Some(SECS_PER_DAY),
        "week" => Some(SECS_PER_WEEK),
        "month" => Some(SECS_PER_MONTH),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn secs(input: &str) -> u64 {
        parse_duration(input).unwrap().as_secs()
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(secs("30 minutes"), 1_800);
        assert_eq!(secs("30m"), 1_800);
        assert_eq!(secs("5 mins"), 300);
        assert_eq!(secs("1 min"), 60);
    }

    #[test]
    fn test_parse_hours() {
        assert_eq!(secs("2 hours"), 7_200);
        assert_eq!(secs("2h"), 7_200);
        assert_eq!(secs("3 hrs"), 10_800);
    }

    #[test]
    fn test_parse_days_weeks_months() {
        assert_eq!(secs("1 day"), 86_400);
        assert_eq!(secs("1d"), 86_400);
        assert_eq!(secs("2 weeks"), 1_209_600);
        assert_eq!(secs("1 month"), 2_592_000);
        assert_eq!(secs("3 months"), 7_776_000);
    }

    #[test]
    fn test_singular_and_plural_match() {
        assert_eq!(parse_duration("1 day"), parse_duration("1 days"));
        assert_eq!(parse_duration("1 week"), parse_duration("1 weeks"));
        assert_eq!(parse_duration("4 hour"), parse_duration("4 hours"));
    }

    #[test]
    fn test_case_insensitive_units() {
        assert_eq!(secs("2 Weeks"), 1_209_600);
        assert_eq!(secs("1 DAY"), 86_400);
        assert_eq!(secs("10M"), 600);
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(secs("   1 day  "), 86_400);
        assert_eq!(secs("1 \t  day"), 86_400);
    }

    #[test]
    fn test_zero_amount_is_valid() {
        assert!(parse_duration("0 days").unwrap().is_zero());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("    ").is_err());
    }

    #[test]
    fn test_rejects_non_numeric_and_negative() {
        assert!(parse_duration("invalid").is_err());
        assert!(parse_duration("hours").is_err());
        assert!(parse_duration("-5 hours").is_err());
        assert!(parse_duration("+5 hours").is_err());
        assert!(parse_duration("1.5 hours").is_err());
        assert!(parse_duration("five hours").is_err());
    }

    #[test]
    fn test_rejects_unknown_units() {
        assert!(parse_duration("5 years").is_err());
        assert!(parse_duration("1 year").is_err());
        assert!(parse_duration("10 s").is_err());
        assert!(parse_duration("10 ms").is_err());
        assert!(parse_duration("2 fortnights").is_err());
    }

    #[test]
    fn test_rejects_malformed_structure() {
        assert!(parse_duration("5").is_err());
        assert!(parse_duration("1 day 2 hours").is_err());
        assert!(parse_duration("1 day extra").is_err());
    }

    #[test]
    fn test_rejects_overflow() {
        assert!(parse_duration("99999999999999999999999 days").is_err());
        assert!(parse_duration("18446744073709551615 months").is_err());
    }

    #[test]
    fn test_error_kind_and_message() {
        let err = parse_duration("5 years").unwrap_err();
        assert!(matches!(err, ReminderError::InvalidDurationFormat(_)));
        let msg = err.to_string();
        assert!(msg.contains("Invalid duration format"), "got: {msg}");
        assert!(msg.contains("years"), "got: {msg}");
    }

    #[test]
    fn test_tokens_adapter() {
        assert_eq!(parse_duration_tokens(&["30", "minutes"]).unwrap().as_secs(), 1_800);
        assert_eq!(parse_duration_tokens(&["2", "hours"]).unwrap().as_secs(), 7_200);
        assert_eq!(parse_duration_tokens(&["1day"]).unwrap().as_secs(), 86_400);
        assert!(parse_duration_tokens::<&str>(&[]).is_err());
        assert!(parse_duration_tokens(&["invalid", "duration"]).is_err());
        assert!(parse_duration_tokens(&["1", "day", "now"]).is_err());
    }

    #[test]
    fn test_display_human_readable() {
        assert_eq!(parse_duration("90 minutes").unwrap().to_string(), "1 hour, 30 minutes");
        assert_eq!(parse_duration("2 weeks").unwrap().to_string(), "14 days");
        assert_eq!(parse_duration("1 m").unwrap().to_string(), "1 minute");
        assert_eq!(ElapsedTime::ZERO.to_string(), "0 minutes");
    }

    #[test]
    fn test_time_delta_conversion() {
        let e = parse_duration("1 day").unwrap();
        assert_eq!(e.as_time_delta(), TimeDelta::days(1));
        assert!(ElapsedTime::try_from_secs(u64::MAX).is_none());
    }

    proptest! {
        #[test]
        fn prop_amount_times_unit(
            amount in 0u64..100_000,
            (unit, per) in prop::sample::select(vec![
                ("m", 60u64), ("min", 60), ("minutes", 60),
                ("h", 3_600), ("hr", 3_600), ("hours", 3_600),
                ("d", 86_400), ("day", 86_400), ("days", 86_400),
                ("week", 604_800), ("weeks", 604_800),
                ("month", 2_592_000), ("months", 2_592_000),
            ]),
        ) {
            let parsed = parse_duration(&format!("{amount} {unit}")).unwrap();
            prop_assert_eq!(parsed.as_secs(), amount * per);
        }

        #[test]
        fn prop_never_panics(input in ".{0,40}") {
            let _ = parse_duration(&input);
        }
    }
}
