//! Progress arithmetic: completion percentage, study streaks, and the quiz
//! average that gates certificates. Dates are day-granular in UTC.

use chrono::NaiveDate;

/// Completion percentage for `completed` lessons out of `total_lessons`.
///
/// A course with no lessons has 0% progress. The result is clamped to 100:
/// deleting a lesson can leave more completions than the denominator.
pub fn overall_progress(completed: i64, total_lessons: i64) -> i64 {
    if total_lessons <= 0 {
        return 0;
    }
    let percentage = ((completed as f64 / total_lessons as f64) * 100.0).round() as i64;
    percentage.min(100)
}

/// Advance the consecutive-day streak for a completion on `today`.
///
/// Returns the new `(streak_days, last_streak_date)` pair. A second
/// completion on the same day changes nothing, and a completion dated
/// before the recorded streak day (clock skew, backdated writes) leaves the
/// streak untouched rather than corrupting it.
pub fn advance_streak(
    streak_days: i64,
    last_streak_date: Option<NaiveDate>,
    today: NaiveDate,
) -> (i64, Option<NaiveDate>) {
    let Some(last) = last_streak_date else {
        return (1, Some(today));
    };

    let days_diff = (today - last).num_days();
    if days_diff == 1 {
        (streak_days + 1, Some(today))
    } else if days_diff > 1 {
        (1, Some(today))
    } else {
        (streak_days, Some(last))
    }
}

/// Mean of the recorded best quiz scores; `None` when no quiz has been
/// taken, which callers must treat as ineligible rather than as a pass.
pub fn average_quiz_score(scores: &[i64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: i64 = scores.iter().sum();
    Some(sum as f64 / scores.len() as f64)
}
