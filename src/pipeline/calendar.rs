//! Time-bucketed histograms and run-length analysis.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};
use std::collections::BTreeMap;

pub const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Per-year arrays of daily counts, indexed by day of year.
pub type DailyCalendar = BTreeMap<i32, Vec<u64>>;

#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[must_use]
pub const fn days_in_year(year: i32) -> usize {
    if is_leap_year(year) { 366 } else { 365 }
}

fn bucket<'a>(times: impl IntoIterator<Item = &'a DateTime<FixedOffset>>, len: usize, index: impl Fn(&DateTime<FixedOffset>) -> usize) -> Vec<u64> {
    let mut counts = vec![0; len];
    for time in times {
        if let Some(count) = counts.get_mut(index(time)) {
            *count += 1;
        }
    }
    counts
}

/// Counts per month, January first.
#[must_use]
pub fn monthly<'a>(times: impl IntoIterator<Item = &'a DateTime<FixedOffset>>) -> Vec<u64> {
    bucket(times, 12, |t| t.month0() as usize)
}

/// Counts per weekday, Monday first.
#[must_use]
pub fn weekdaily<'a>(times: impl IntoIterator<Item = &'a DateTime<FixedOffset>>) -> Vec<u64> {
    bucket(times, 7, |t| t.weekday().num_days_from_monday() as usize)
}

/// Counts per hour of the day in each timestamp's own offset.
#[must_use]
pub fn hourly<'a>(times: impl IntoIterator<Item = &'a DateTime<FixedOffset>>) -> Vec<u64> {
    bucket(times, 24, |t| t.hour() as usize)
}

/// Counts per calendar day, grouped by year.
///
/// Each year present holds 365 or 366 entries; years without any timestamp are absent.
#[must_use]
pub fn daily<'a>(times: impl IntoIterator<Item = &'a DateTime<FixedOffset>>) -> DailyCalendar {
    let mut calendar = DailyCalendar::new();
    for time in times {
        let year = time.year();
        let days = calendar.entry(year).or_insert_with(|| vec![0; days_in_year(year)]);
        if let Some(count) = days.get_mut(time.ordinal0() as usize) {
            *count += 1;
        }
    }
    calendar
}

/// Adds `other` into `calendar`, day by day.
pub fn merge_daily(calendar: &mut DailyCalendar, other: &DailyCalendar) {
    for (year, days) in other {
        let target = calendar.entry(*year).or_insert_with(|| vec![0; days.len()]);
        for (total, count) in target.iter_mut().zip(days) {
            *total += count;
        }
    }
}

/// Adds `other` into `totals` element-wise.
pub fn merge_buckets(totals: &mut [u64], other: &[u64]) {
    for (total, count) in totals.iter_mut().zip(other) {
        *total += count;
    }
}

/// The date of a day-of-year index.
#[must_use]
pub fn date_of(year: i32, day_index: usize) -> Option<NaiveDate> {
    u32::try_from(day_index + 1).ok().and_then(|ordinal| NaiveDate::from_yo_opt(year, ordinal))
}

/// Length of the longest run of consecutive days with at least one event.
#[must_use]
pub fn longest_streak(days: &[u64]) -> usize {
    longest_run(days, |count| count > 0)
}

/// Length of the longest run of consecutive days without events.
#[must_use]
pub fn longest_break(days: &[u64]) -> usize {
    longest_run(days, |count| count == 0)
}

fn longest_run(days: &[u64], predicate: impl Fn(u64) -> bool) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for &count in days {
        if predicate(count) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Index of the first maximal bucket; 0 for empty input.
#[must_use]
pub fn busiest(buckets: &[u64]) -> usize {
    let mut best = 0;
    for (index, count) in buckets.iter().enumerate() {
        if buckets.get(best).is_some_and(|max| count > max) {
            best = index;
        }
    }
    best
}
