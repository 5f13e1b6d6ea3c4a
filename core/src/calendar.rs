//! Working-day arithmetic for the monthly pace numbers.

use crate::{
    error::{TrackerError, TrackerResult},
    types::WorkDay,
};
use chrono::{Datelike, Duration, NaiveDate};

/// Monday-first weekday labels, indexed by `WorkDay`.
pub const DAYS_OF_WEEK: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn weekday_index(date: NaiveDate) -> WorkDay {
    date.weekday().num_days_from_monday() as WorkDay
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Work days remaining in `today`'s month, counting `today` itself.
pub fn working_days_left(today: NaiveDate, work_days: &[WorkDay]) -> u32 {
    let end = last_day_of_month(today);
    let mut count = 0;
    let mut day = today;
    while day <= end {
        if work_days.contains(&weekday_index(day)) {
            count += 1;
        }
        day += Duration::days(1);
    }
    count
}

/// Flip one weekday in or out of the schedule, keeping it sorted.
pub fn toggle_work_day(work_days: &mut Vec<WorkDay>, day: WorkDay) -> TrackerResult<()> {
    if day > 6 {
        return Err(TrackerError::InvalidWorkDay { day });
    }
    if let Some(pos) = work_days.iter().position(|d| *d == day) {
        work_days.remove(pos);
    } else {
        work_days.push(day);
        work_days.sort_unstable();
    }
    Ok(())
}

/// Parse `Mon`, `tue`, or a bare index into a `WorkDay`.
pub fn parse_work_day(input: &str) -> TrackerResult<WorkDay> {
    let trimmed = input.trim();
    if let Ok(idx) = trimmed.parse::<u8>() {
        return if idx <= 6 {
            Ok(idx)
        } else {
            Err(TrackerError::InvalidWorkDay { day: idx })
        };
    }
    let lower = trimmed.to_ascii_lowercase();
    DAYS_OF_WEEK
        .iter()
        .position(|d| lower.starts_with(&d.to_ascii_lowercase()))
        .map(|idx| idx as WorkDay)
        .ok_or_else(|| anyhow::anyhow!("unknown weekday '{input}'").into())
}
