//! age.rs
//!
//! Account age in whole years, the way the README sentence reports it:
//!     floor(elapsed / 365.25 days)
//!
//! This is a plain truncation against the average Julian year, not a
//! calendar-aware difference. An account created on 2020-06-01 is "3 years"
//! old from roughly 2023-06-01 06:00 onwards, because 365.25-day years drift
//! against the calendar.

use chrono::{DateTime, Utc};

/// Milliseconds in 365.25 days, kept as 4 years / 4 so the maths stays integral.
const MILLIS_PER_FOUR_YEARS: i64 = 1461 * 24 * 60 * 60 * 1000;

/// Whole years between `created_at` and `now`. Never negative.
pub fn years_since(created_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let elapsed = (now - created_at).num_milliseconds();
    if elapsed <= 0 {
        return 0;
    }

    // elapsed / (1461 / 4 days) == elapsed * 4 / 1461 days
    let years = (i128::from(elapsed) * 4) / i128::from(MILLIS_PER_FOUR_YEARS);
    u32::try_from(years).unwrap_or(u32::MAX)
}
