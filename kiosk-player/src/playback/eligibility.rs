//! Eligibility evaluation
//!
//! Answers "is this item *scheduled* to play now". Default items
//! ([`ScheduleSpec::None`]) and malformed schedules are never eligible here;
//! the queue builder handles the default partition separately.

use chrono::{DateTime, Datelike, FixedOffset};
use kiosk_common::schedule::minute_of_day;
use kiosk_common::{PlaylistItem, RecurringWindow, ScheduleSpec};

/// Pure predicate over (item, now)
pub fn is_eligible(item: &PlaylistItem, now: &DateTime<FixedOffset>) -> bool {
    schedule_matches(&item.schedule, now)
}

/// Evaluate a schedule at `now`
pub fn schedule_matches(schedule: &ScheduleSpec, now: &DateTime<FixedOffset>) -> bool {
    match schedule {
        ScheduleSpec::Absolute { start, end } => start <= now && now < end,
        ScheduleSpec::Recurring(window) => recurring_matches(window, now),
        ScheduleSpec::None | ScheduleSpec::Malformed { .. } => false,
    }
}

/// Local date in range, weekday listed, minute of day in `[start, end)`
fn recurring_matches(window: &RecurringWindow, now: &DateTime<FixedOffset>) -> bool {
    let date = now.date_naive();
    if date < window.start_date || date > window.end_date {
        return false;
    }
    if !window.runs_on(now.weekday()) {
        return false;
    }
    let minute = minute_of_day(now.time());
    window.start_minute() <= minute && minute < window.end_minute()
}
