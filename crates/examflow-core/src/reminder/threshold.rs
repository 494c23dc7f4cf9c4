//! Reminder day arithmetic.
//!
//! All date math is day-granular: an exam is "7 days away" when its
//! calendar date is seven days after today's calendar date, regardless
//! of the time of day either side.

use chrono::NaiveDate;

/// Days-before-start on which a reminder fires. Day 0 is the exam day.
pub const REMINDER_OFFSETS: [i64; 5] = [7, 5, 3, 1, 0];

/// Whole days from `today` until `start`. Negative once the exam has
/// started.
pub fn days_until(today: NaiveDate, start: NaiveDate) -> i64 {
    start.signed_duration_since(today).num_days()
}

/// Whether an exam this many days away gets a reminder today.
pub fn is_reminder_day(days_left: i64) -> bool {
    REMINDER_OFFSETS.contains(&days_left)
}

/// Deterministic suppression identifier for one exam at one distance.
///
/// Same title, start date, and offset always produce the same tag, so
/// suppression survives restarts and rebuilt schedules. Two exams that
/// share a title and start date alias each other.
pub fn reminder_tag(title: &str, start: NaiveDate, days_left: i64) -> String {
    format!("{title}-{}-D{days_left}", start.format("%Y-%m-%d"))
}
