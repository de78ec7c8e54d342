//! calendar.rs
//!
//! Streak and weekly-activity derivation over a GitHub contribution calendar.
//!
//! Only the trailing `WINDOW_DAYS` days are considered. Current and longest
//! streaks are scanned independently over that window, so a past run may be
//! longer than the trailing one.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;

use crate::stats::DayActivity;

pub const WINDOW_DAYS: usize = 365;
pub const WEEK_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContributionDay {
    #[serde(rename = "contributionCount")]
    pub count: u64,
    pub date: NaiveDate,
}

/// Trailing year of a contribution calendar, oldest first.
pub fn trailing_window(days: &[ContributionDay]) -> &[ContributionDay] {
    &days[days.len().saturating_sub(WINDOW_DAYS)..]
}

/// Consecutive active days counting back from the newest day.
pub fn current_streak(days: &[ContributionDay]) -> u32 {
    trailing_window(days)
        .iter()
        .rev()
        .take_while(|d| d.count > 0)
        .count() as u32
}

/// Longest run of active days anywhere in the window.
pub fn longest_streak(days: &[ContributionDay]) -> u32 {
    let mut best = 0u32;
    let mut run = 0u32;
    for day in trailing_window(days) {
        if day.count > 0 {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

/// Last seven days of the window, oldest first, labelled by weekday.
pub fn weekly_activity(days: &[ContributionDay]) -> Vec<DayActivity> {
    let window = trailing_window(days);
    window[window.len().saturating_sub(WEEK_DAYS)..]
        .iter()
        .map(|d| DayActivity::new(weekday_label(d.date.weekday()), d.count))
        .collect()
}

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
