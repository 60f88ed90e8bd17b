//! Streak calculation over a habit's distinct completion dates.

use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Current streak ending at (or just before) `today`.
///
/// Walks backward day by day from `today`, counting consecutive completed
/// days until the first gap. If `today` itself is not yet marked but
/// yesterday is, the walk starts at yesterday instead: a streak is not reset
/// to zero merely because today has not been marked yet.
pub fn current_streak(dates: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut cursor = today;

    while dates.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }

    if streak == 0 && dates.contains(&(today - Duration::days(1))) {
        cursor = today - Duration::days(1);
        while dates.contains(&cursor) {
            streak += 1;
            cursor -= Duration::days(1);
        }
    }

    streak
}

/// Longest streak ever, over distinct completion dates sorted ascending.
pub fn longest_streak(sorted_dates: &[NaiveDate]) -> u32 {
    if sorted_dates.is_empty() {
        return 0;
    }

    let mut longest = 1u32;
    let mut run = 1u32;

    for pair in sorted_dates.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }

    longest
}
