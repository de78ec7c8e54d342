//! Placeholder values for fields GitHub did not supply.
//!
//! Every generator takes the random source as an argument so callers can
//! seed it. Ranges are half-open.

use std::ops::Range;

use rand::Rng;

use crate::stats::DayActivity;

pub const CONTRIBUTIONS: Range<u64> = 100..300;
pub const DAILY_COMMITS: Range<u64> = 1..21;
pub const CURRENT_STREAK: Range<u32> = 1..31;
pub const LONGEST_STREAK: Range<u32> = 10..110;

const WEEK: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn contributions<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.gen_range(CONTRIBUTIONS)
}

pub fn current_streak<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(CURRENT_STREAK)
}

pub fn longest_streak<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(LONGEST_STREAK)
}

/// Monday through Sunday with random commit counts.
pub fn weekly_activity<R: Rng + ?Sized>(rng: &mut R) -> Vec<DayActivity> {
    WEEK.iter()
        .map(|day| DayActivity::new(*day, rng.gen_range(DAILY_COMMITS)))
        .collect()
}
