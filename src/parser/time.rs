//! Time-of-day handling
//!
//! Every time that travels between the parser, the task store and the alarm
//! monitor is a [`ClockTime`]. Its text form is always `H:MM AM/PM`: hour
//! without a leading zero, two-digit minute, uppercase period. Alarm matching
//! compares these values for equality, so all producers must agree on it.

use crate::parser::numbers::word_to_number;
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Half of the day a [`ClockTime`] falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Am,
    Pm,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Am => "AM",
            Period::Pm => "PM",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 12-hour clock time of day (hour 1-12, minute 0-59)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockTime {
    hour: u32,
    minute: u32,
    period: Period,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("could not parse time of day: '{0}'")]
pub struct ParseClockTimeError(String);

impl ClockTime {
    pub const NOON: ClockTime = ClockTime { hour: 12, minute: 0, period: Period::Pm };
    pub const MIDNIGHT: ClockTime = ClockTime { hour: 12, minute: 0, period: Period::Am };

    /// Build a time from 12-hour parts, rejecting out-of-range values
    pub fn new(hour: u32, minute: u32, period: Period) -> Option<Self> {
        if (1..=12).contains(&hour) && minute < 60 {
            Some(Self { hour, minute, period })
        } else {
            None
        }
    }

    /// Convert a 24-hour clock reading (0 -> 12 AM, 12 -> 12 PM, 13+ -> PM)
    pub fn from_24h(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        let (hour, period) = match hour {
            0 => (12, Period::Am),
            12 => (12, Period::Pm),
            h if h > 12 => (h - 12, Period::Pm),
            h => (h, Period::Am),
        };
        Some(Self { hour, minute, period })
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        // NaiveTime hours and minutes are always in range
        Self::from_24h(time.hour(), time.minute()).unwrap_or(Self::MIDNIGHT)
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn hour_24(&self) -> u32 {
        match (self.period, self.hour) {
            (Period::Am, 12) => 0,
            (Period::Am, h) => h,
            (Period::Pm, 12) => 12,
            (Period::Pm, h) => h + 12,
        }
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour_24() * 60 + self.minute
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour_24(), self.minute, 0).unwrap_or_default()
    }

    /// Whether `time` falls within this clock minute
    pub fn matches(&self, time: NaiveTime) -> bool {
        self.minutes_since_midnight() == time.hour() * 60 + time.minute()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02} {}", self.hour, self.minute, self.period)
    }
}

impl Ord for ClockTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.minutes_since_midnight().cmp(&other.minutes_since_midnight())
    }
}

impl PartialOrd for ClockTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

static STORED_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?(?P<period>AM|PM|A\.M\.?|P\.M\.?)?$")
        .expect("stored time pattern must compile")
});

/// Parses the canonical form and the looser shapes older records may carry:
/// `"06:35 PM"`, `"6:35pm"`, `"6 PM"`, `"18:35"`.
impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.trim().to_uppercase().split_whitespace().collect();
        let error = || ParseClockTimeError(s.to_string());

        let caps = STORED_TIME.captures(&compact).ok_or_else(error)?;
        let hour: u32 = caps["hour"].parse().map_err(|_| error())?;
        let minute: u32 = match caps.name("minute") {
            Some(m) => m.as_str().parse().map_err(|_| error())?,
            None => 0,
        };

        let time = match caps.name("period") {
            Some(p) if p.as_str().starts_with('P') => ClockTime::new(hour, minute, Period::Pm),
            Some(_) => ClockTime::new(hour, minute, Period::Am),
            None => ClockTime::from_24h(hour, minute),
        };
        time.ok_or_else(error)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Unit of a relative delay ("in 10 minutes", "after 2 hours")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Minute,
    Hour,
}

impl TimeUnit {
    pub fn from_word(word: &str) -> Option<Self> {
        let word = word.to_lowercase();
        if word.starts_with("min") {
            Some(TimeUnit::Minute)
        } else if word.starts_with("hour") || word.starts_with("hr") {
            Some(TimeUnit::Hour)
        } else {
            None
        }
    }

    fn duration(self, amount: u32) -> Duration {
        match self {
            TimeUnit::Minute => Duration::minutes(i64::from(amount)),
            TimeUnit::Hour => Duration::hours(i64::from(amount)),
        }
    }
}

/// Clock time `amount` units after `now`
pub fn relative_time(now: NaiveDateTime, amount: u32, unit: TimeUnit) -> Option<ClockTime> {
    let target = now.checked_add_signed(unit.duration(amount))?;
    Some(ClockTime::from_naive_time(target.time()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternKind {
    SpacedPeriod,
    AttachedPeriod,
    HourMinutePeriod,
    OClock,
    DayPart,
    BareHour,
    TwentyFourHour,
}

struct TimePattern {
    kind: PatternKind,
    regex: Regex,
}

// The `(?:^|[^:\d])` guard keeps the minute digits of "10:05 pm" from being
// read as an hour by the period-only patterns.
static TIME_PATTERNS: Lazy<Vec<TimePattern>> = Lazy::new(|| {
    [
        (PatternKind::SpacedPeriod, r"(?:^|[^:\d])(?P<hour>\d{1,2})\s+(?P<period>[ap]\.?\s*m)\b"),
        (PatternKind::AttachedPeriod, r"(?:^|[^:\d])(?P<hour>\d{1,2})\s*(?P<period>[ap]\.?\s?m)\b"),
        (
            PatternKind::HourMinutePeriod,
            r"(?:^|[^:\d])(?P<hour>\d{1,2}):(?P<minute>\d{2})\s*(?P<period>[ap]\.?\s?m)\b",
        ),
        (
            PatternKind::OClock,
            r"(?:^|[^:\d])(?P<hour>\d{1,2})\s*o['’]?\s?clock\b(?:\s*(?P<period>[ap]\.?\s?m)\b)?",
        ),
        (
            PatternKind::DayPart,
            r"(?:^|[^:\d])(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?\s+(?:(?:in\s+the|at|this)\s+)?(?:morning|afternoon|evening|night|tonight)\b",
        ),
        (PatternKind::BareHour, r"^(?P<hour>\d{1,2})$"),
        (PatternKind::TwentyFourHour, r"(?:^|[^:\d])(?P<hour>\d{1,2}):(?P<minute>\d{2})\b"),
    ]
    .into_iter()
    .map(|(kind, pattern)| TimePattern {
        kind,
        regex: Regex::new(pattern).expect("time pattern must compile"),
    })
    .collect()
});

const PERIOD_MARKERS: &[&str] =
    &["am", "pm", "a.m", "p.m", "a.m.", "p.m.", "morning", "afternoon", "evening", "night"];
const PM_WORDS: &[&str] = &["evening", "night", "tonight", "afternoon", "p", "pm"];
const AM_WORDS: &[&str] = &["morning", "a", "am"];

impl TimePattern {
    fn resolve(&self, caps: &Captures, text: &str) -> Option<ClockTime> {
        let hour: u32 = caps.name("hour")?.as_str().parse().ok()?;
        let minute: u32 = match caps.name("minute") {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };

        if self.kind == PatternKind::TwentyFourHour {
            return ClockTime::from_24h(hour, minute);
        }

        let mut period = match caps.name("period") {
            Some(p) if p.as_str().contains('p') => Period::Pm,
            Some(_) => Period::Am,
            None => infer_period(text, hour),
        };

        let hour = if hour > 12 {
            period = Period::Pm;
            hour - 12
        } else if hour == 0 {
            period = Period::Am;
            12
        } else {
            hour
        };

        ClockTime::new(hour, minute, period)
    }
}

fn tokens(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.split_whitespace().map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
}

fn infer_period(text: &str, hour: u32) -> Period {
    if tokens(text).any(|t| PM_WORDS.contains(&t)) {
        Period::Pm
    } else if tokens(text).any(|t| AM_WORDS.contains(&t)) {
        Period::Am
    } else if (1..=11).contains(&hour) {
        Period::Am
    } else {
        Period::Pm
    }
}

/// Rewrite spelled-out hours ("ten" -> "10"); only values 1-12 are touched
fn convert_hour_words(text: &str) -> String {
    text.split_whitespace()
        .map(|token| {
            if PERIOD_MARKERS.contains(&token) {
                return token.to_string();
            }
            match word_to_number(token) {
                Some(n) if (1..=12).contains(&n) => n.to_string(),
                _ => token.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a spoken time phrase ("ten pm", "10:30 pm", "18:35", "noon")
///
/// Returns `None` when no time can be determined.
pub fn normalize_time(phrase: &str) -> Option<ClockTime> {
    let lowered = phrase.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }

    if tokens(&lowered).any(|t| t == "noon" || t == "midday") {
        return Some(ClockTime::NOON);
    }
    if tokens(&lowered).any(|t| t == "midnight") {
        return Some(ClockTime::MIDNIGHT);
    }

    let text = convert_hour_words(&lowered);
    trace!("Time phrase after hour-word conversion: '{}'", text);

    for pattern in TIME_PATTERNS.iter() {
        let Some(caps) = pattern.regex.captures(&text) else {
            continue;
        };
        trace!("Time pattern {:?} matched '{}'", pattern.kind, text);
        if let Some(time) = pattern.resolve(&caps, &text) {
            debug!("Normalized time phrase to {}", time);
            return Some(time);
        }
    }

    debug!("Could not determine a time from '{}'", text);
    None
}
