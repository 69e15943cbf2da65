//! Task schedules and their pre-flight validation
//!
//! A schedule is a `(schedule_type, schedule_value)` pair as the agent
//! supplies it. Validation happens before anything is written so that a
//! bad value never reaches the scheduler.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone};
use croner::Cron;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref UTC_SUFFIX_REGEX: Regex = Regex::new(r"[Zz]$").unwrap();
    static ref OFFSET_SUFFIX_REGEX: Regex = Regex::new(r"[+-]\d{2}:\d{2}$").unwrap();
}

/// Accepted local date-time layouts for `once` schedules
const LOCAL_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// How a task's schedule value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    /// Cron expression in local time
    Cron,
    /// Milliseconds between runs
    Interval,
    /// Single run at a local timestamp
    Once,
}

impl ScheduleType {
    pub const ALL: [ScheduleType; 3] = [Self::Cron, Self::Interval, Self::Once];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cron => "cron",
            Self::Interval => "interval",
            Self::Once => "once",
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown schedule_type '{}' (expected cron, interval or once)", s))
    }
}

/// Whether a scheduled run sees the group's conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextMode {
    /// Runs with chat history and memory
    #[default]
    Group,
    /// Fresh session; the prompt carries all context
    Isolated,
}

impl ContextMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Isolated => "isolated",
        }
    }
}

impl FromStr for ContextMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(Self::Group),
            "isolated" => Ok(Self::Isolated),
            other => Err(format!(
                "unknown context_mode '{}' (expected group or isolated)",
                other
            )),
        }
    }
}

/// Rejected schedule values, worded as instructions for the agent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid cron: \"{value}\". Use format like \"0 9 * * *\" (daily 9am) or \"*/5 * * * *\" (every 5 min).")]
    InvalidCron { value: String },

    #[error("Invalid interval: \"{value}\". Must be positive milliseconds (e.g., \"300000\" for 5 min).")]
    InvalidInterval { value: String },

    #[error("Timestamp must be local time without timezone suffix. Got \"{value}\" — use format like \"2026-02-01T15:30:00\".")]
    TimezoneSuffix { value: String },

    #[error("Invalid timestamp: \"{value}\". Use local time format like \"2026-02-01T15:30:00\".")]
    InvalidTimestamp { value: String },
}

/// A validated schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    Cron(String),
    Interval { millis: u64 },
    Once(NaiveDateTime),
}

impl Schedule {
    /// Validate `value` against `schedule_type`
    pub fn parse(schedule_type: ScheduleType, value: &str) -> Result<Self, ScheduleError> {
        match schedule_type {
            ScheduleType::Cron => {
                parse_cron(value).map_err(|_| ScheduleError::InvalidCron {
                    value: value.to_string(),
                })?;
                Ok(Self::Cron(value.to_string()))
            }
            ScheduleType::Interval => match parse_leading_int(value) {
                Some(ms) if ms > 0 => Ok(Self::Interval { millis: ms as u64 }),
                _ => Err(ScheduleError::InvalidInterval {
                    value: value.to_string(),
                }),
            },
            ScheduleType::Once => {
                if has_timezone_suffix(value) {
                    return Err(ScheduleError::TimezoneSuffix {
                        value: value.to_string(),
                    });
                }
                parse_local_datetime(value)
                    .map(Self::Once)
                    .ok_or_else(|| ScheduleError::InvalidTimestamp {
                        value: value.to_string(),
                    })
            }
        }
    }

    pub fn schedule_type(&self) -> ScheduleType {
        match self {
            Self::Cron(_) => ScheduleType::Cron,
            Self::Interval { .. } => ScheduleType::Interval,
            Self::Once(_) => ScheduleType::Once,
        }
    }

    /// First run strictly after `now`, or the `once` time itself
    ///
    /// `None` when no future occurrence exists, when an interval overflows
    /// the calendar, or when the local time is skipped by a DST transition.
    pub fn next_run(&self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        match self {
            Self::Cron(expr) => parse_cron(expr)
                .ok()?
                .find_next_occurrence(&now, false)
                .ok(),
            Self::Interval { millis } => {
                let delta = Duration::try_milliseconds(i64::try_from(*millis).ok()?)?;
                now.checked_add_signed(delta)
            }
            Self::Once(at) => Local.from_local_datetime(at).earliest(),
        }
    }
}

/// Validate without keeping the parsed form
pub fn validate_schedule(schedule_type: ScheduleType, value: &str) -> Result<(), ScheduleError> {
    Schedule::parse(schedule_type, value).map(|_| ())
}

fn parse_cron(expr: &str) -> Result<Cron, croner::errors::CronError> {
    Cron::new(expr.trim()).with_seconds_optional().parse()
}

/// Parse an integer prefix the way a lenient `parseInt` does
///
/// Leading whitespace and a sign are allowed, trailing garbage is ignored,
/// no digits at all is `None`.
fn parse_leading_int(value: &str) -> Option<i64> {
    let s = value.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add((b - b'0') as i64));
    Some(if negative { -magnitude } else { magnitude })
}

fn has_timezone_suffix(value: &str) -> bool {
    UTC_SUFFIX_REGEX.is_match(value) || OFFSET_SUFFIX_REGEX.is_match(value)
}

fn parse_local_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
