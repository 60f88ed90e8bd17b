//! Consistency scoring over a trailing window clipped to the habit's
//! creation date.

use chrono::{Duration, NaiveDate};

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Start of the effective scoring window.
///
/// The trailing window never extends before the habit existed, so a newly
/// created habit is not penalized for days before its creation.
pub fn effective_window_start(
    today: NaiveDate,
    window_days: u32,
    created: NaiveDate,
) -> NaiveDate {
    let window_start = today - Duration::days(window_days as i64);
    window_start.max(created)
}

/// Consistency score in [0.0, 100.0], rounded to one decimal.
///
/// `completions` is the number of completed days within
/// `[effective_start, today]`. When `today < effective_start` (habit created
/// in the future relative to the evaluation date, a clock-skew case) the
/// window is degenerate and the score is a defined 100.0 sentinel. The score
/// is capped at 100.0 even if completions exceed the day count.
pub fn consistency_score(completions: i64, effective_start: NaiveDate, today: NaiveDate) -> f64 {
    let total_days = (today - effective_start).num_days() + 1;
    if total_days <= 0 {
        return 100.0;
    }

    let score = completions as f64 / total_days as f64 * 100.0;
    round1(score.min(100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_window_clipped_to_creation_date() {
        // Habit created 5 days ago, 30-day window: the window starts at creation
        let start = effective_window_start(d("2026-08-05"), 30, d("2026-08-01"));
        assert_eq!(start, d("2026-08-01"));

        // Old habit: the window is the full 30 days
        let start = effective_window_start(d("2026-08-05"), 30, d("2026-01-01"));
        assert_eq!(start, d("2026-07-06"));
    }

    #[test]
    fn test_empty_window_scores_zero() {
        assert_eq!(consistency_score(0, d("2026-07-06"), d("2026-08-05")), 0.0);
    }

    #[test]
    fn test_full_window_scores_hundred() {
        // 31 inclusive days, 31 completions
        assert_eq!(consistency_score(31, d("2026-07-06"), d("2026-08-05")), 100.0);
    }

    #[test]
    fn test_score_is_rounded_to_one_decimal() {
        // 10 of 31 days = 32.258...
        assert_eq!(consistency_score(10, d("2026-07-06"), d("2026-08-05")), 32.3);
    }

    #[test]
    fn test_habit_created_today() {
        // effective_start == today: one-day window, zero completions -> 0.0,
        // not the degenerate-window sentinel
        assert_eq!(consistency_score(0, d("2026-08-05"), d("2026-08-05")), 0.0);
        assert_eq!(consistency_score(1, d("2026-08-05"), d("2026-08-05")), 100.0);
    }

    #[test]
    fn test_degenerate_window_sentinel() {
        // Creation date after the evaluation date: defined sentinel, not an error
        assert_eq!(consistency_score(0, d("2026-08-06"), d("2026-08-05")), 100.0);
    }

    #[test]
    fn test_excess_completions_capped() {
        assert_eq!(consistency_score(50, d("2026-08-01"), d("2026-08-05")), 100.0);
    }

    #[test]
    fn test_monotone_in_completion_count() {
        let mut prev = -1.0;
        for n in 0..=31 {
            let score = consistency_score(n, d("2026-07-06"), d("2026-08-05"));
            assert!(score >= prev, "score must not decrease: {} < {}", score, prev);
            prev = score;
        }
    }
}
