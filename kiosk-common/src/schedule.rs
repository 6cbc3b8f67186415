//! Schedule specifications and their classification at ingest
//!
//! A record maps to exactly one [`ScheduleSpec`]:
//! - no schedule fields at all: [`ScheduleSpec::None`] (a default item)
//! - a complete one-time pair: [`ScheduleSpec::Absolute`]
//! - all five recurring fields: [`ScheduleSpec::Recurring`]
//! - anything else: [`ScheduleSpec::Malformed`], which plays in neither the
//!   scheduled nor the default partition

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::PlaylistRecord;

/// When an item is allowed to play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScheduleSpec {
    /// No constraints
    None,
    /// One-time window `[start, end)`
    Absolute {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
    /// Daily window on selected weekdays within a date range
    Recurring(RecurringWindow),
    /// Schedule fields present but incomplete or unparseable
    Malformed { reason: String },
}

/// Recurring window. Dates are inclusive, the daily window is half-open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_start: NaiveTime,
    pub daily_end: NaiveTime,
    /// Sorted, without duplicates
    pub days: Vec<Weekday>,
}

impl RecurringWindow {
    /// Minute of day the window opens (seconds floored)
    pub fn start_minute(&self) -> u32 {
        minute_of_day(self.daily_start)
    }

    /// Minute of day the window closes, exclusive (seconds floored)
    pub fn end_minute(&self) -> u32 {
        minute_of_day(self.daily_end)
    }

    pub fn runs_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }
}

/// Minutes since midnight, seconds floored
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

impl ScheduleSpec {
    /// Classify the schedule fields of a wire record
    pub fn from_record(record: &PlaylistRecord) -> Self {
        if !record.has_schedule_fields() {
            return ScheduleSpec::None;
        }

        match classify(record) {
            Ok(spec) => spec,
            Err(e) => ScheduleSpec::Malformed {
                reason: match e {
                    Error::MalformedSchedule(reason) => reason,
                    other => other.to_string(),
                },
            },
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ScheduleSpec::Malformed { .. })
    }
}

fn classify(record: &PlaylistRecord) -> Result<ScheduleSpec> {
    if record.has_one_time_fields() {
        let start = required(&record.start_at, "startAt")?;
        let end = required(&record.end_at, "endAt")?;
        return Ok(ScheduleSpec::Absolute {
            start: parse_instant(start)?,
            end: parse_instant(end)?,
        });
    }

    let start_date = parse_date(required(&record.start_date, "startDate")?)?;
    let end_date = parse_date(required(&record.end_date, "endDate")?)?;
    let daily_start = parse_clock_time(required(&record.daily_start, "dailyStart")?)?;
    let daily_end = parse_clock_time(required(&record.daily_end, "dailyEnd")?)?;

    let codes = record
        .days
        .as_ref()
        .map(|d| d.codes())
        .unwrap_or_default();
    if codes.is_empty() {
        return Err(Error::MalformedSchedule("missing days".to_string()));
    }
    let mut days = codes
        .iter()
        .map(|code| parse_weekday(code))
        .collect::<Result<Vec<_>>>()?;
    days.sort_by_key(|d| d.num_days_from_monday());
    days.dedup();

    Ok(ScheduleSpec::Recurring(RecurringWindow {
        start_date,
        end_date,
        daily_start,
        daily_end,
        days,
    }))
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::MalformedSchedule(format!("missing {}", name)))
}

/// Parse an RFC 3339 instant
pub fn parse_instant(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map_err(|e| Error::MalformedSchedule(format!("invalid instant '{}': {}", value, e)))
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| Error::MalformedSchedule(format!("invalid date '{}': {}", value, e)))
}

/// Parse `HH:mm` or `HH:mm:ss`
pub fn parse_clock_time(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| Error::MalformedSchedule(format!("invalid time of day '{}'", value)))
}

/// Parse a weekday code (`mon`..`sun` or full names, any case)
pub fn parse_weekday(code: &str) -> Result<Weekday> {
    code.trim()
        .parse::<Weekday>()
        .map_err(|_| Error::MalformedSchedule(format!("invalid weekday '{}'", code)))
}
