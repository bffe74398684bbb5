//! Consecutive-day streak computation.

use chrono::{Duration, NaiveDate};

/// Advance the streak counter for a study event happening on `today`.
///
/// A repeat on the same day leaves the streak alone, an event on the day
/// after the last recorded one extends it, and anything else (no prior
/// event, a gap of two or more days, or a last-study day in the future)
/// restarts the streak at 1.
pub fn next_streak(streak: u32, last_study_day: Option<NaiveDate>, today: NaiveDate) -> u32 {
    match last_study_day {
        Some(day) if day == today => streak,
        Some(day) if today - day == Duration::days(1) => streak + 1,
        _ => 1,
    }
}
