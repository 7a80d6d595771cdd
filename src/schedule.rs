//! Split scheduler: decides which workout label applies to a calendar
//! date. Pure date arithmetic, no I/O — `today` is always passed in so
//! callers (and tests) control the clock.

use chrono::NaiveDate;

use crate::{models::SplitConfig, types::weekday_day_type};

pub const REST_DAY: &str = "Rest Day";

/// Resolve the workout label for `today`.
///
/// With no configured rotation this falls back to the legacy fixed
/// weekday table. Otherwise the rotation is anchored to its absolute
/// start date: `rest_pattern` workout days are followed by exactly one
/// rest day, and the day labels cycle through `days` in order. The
/// anchor-date design keeps the schedule stable regardless of how many
/// days go by between invocations.
pub fn resolve_workout_label(split: Option<&SplitConfig>, today: NaiveDate) -> String {
    let Some(split) = split else {
        return weekday_day_type(today).to_string();
    };

    // A rotation with no day labels is as good as no rotation.
    if split.days.is_empty() {
        return weekday_day_type(today).to_string();
    }

    let days_since_start = (today - split.start_date).num_days();

    // Missing rest pattern defaults to a full pass over the day list.
    let rest_pattern = split
        .rest_pattern
        .unwrap_or(split.days.len() as u32)
        .max(1) as i64;
    let cycle_length = rest_pattern + 1;

    let current_day_index = split.current_day_index.unwrap_or(0) as i64;
    let total_days_into_rotation = current_day_index + days_since_start;

    // rem_euclid keeps the position non-negative even when `today`
    // precedes the anchor date.
    let position_in_cycle = total_days_into_rotation.rem_euclid(cycle_length);

    if position_in_cycle >= rest_pattern {
        return REST_DAY.to_string();
    }

    let day_index = (position_in_cycle as usize) % split.days.len();
    split.days[day_index].clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn split(days: &[&str], rest_pattern: Option<u32>, index: Option<usize>, start: NaiveDate) -> SplitConfig {
        SplitConfig {
            split_type: "custom".to_string(),
            days: days.iter().map(|s| s.to_string()).collect(),
            rest_pattern,
            current_day_index: index,
            start_date: start,
        }
    }

    #[test]
    fn no_split_uses_weekday_table() {
        // 2025-01-06 is a Monday.
        assert_eq!(resolve_workout_label(None, d(2025, 1, 6)), "Chest & Triceps");
        assert_eq!(resolve_workout_label(None, d(2025, 1, 7)), "Back & Abs");
        assert_eq!(resolve_workout_label(None, d(2025, 1, 8)), "Biceps & Shoulders");
        assert_eq!(resolve_workout_label(None, d(2025, 1, 9)), "Chest & Triceps");
        assert_eq!(resolve_workout_label(None, d(2025, 1, 10)), "Legs, Rear Delt & Forearms");
        assert_eq!(resolve_workout_label(None, d(2025, 1, 11)), REST_DAY);
        assert_eq!(resolve_workout_label(None, d(2025, 1, 12)), REST_DAY);
    }

    #[test]
    fn empty_day_list_falls_back_to_weekday_table() {
        let s = split(&[], Some(3), Some(0), d(2025, 1, 1));
        assert_eq!(resolve_workout_label(Some(&s), d(2025, 1, 11)), REST_DAY);
        assert_eq!(resolve_workout_label(Some(&s), d(2025, 1, 6)), "Chest & Triceps");
    }

    #[test]
    fn rotation_cycles_with_rest_day() {
        let start = d(2025, 3, 3);
        let s = split(&["A", "B", "C"], Some(3), Some(0), start);

        assert_eq!(resolve_workout_label(Some(&s), start), "A");
        assert_eq!(resolve_workout_label(Some(&s), start + chrono::Days::new(1)), "B");
        assert_eq!(resolve_workout_label(Some(&s), start + chrono::Days::new(2)), "C");
        assert_eq!(resolve_workout_label(Some(&s), start + chrono::Days::new(3)), REST_DAY);
        assert_eq!(resolve_workout_label(Some(&s), start + chrono::Days::new(4)), "A");
        // Cycle repeats every 4 days.
        assert_eq!(resolve_workout_label(Some(&s), start + chrono::Days::new(8)), "A");
    }

    #[test]
    fn current_day_index_shifts_anchor() {
        let start = d(2025, 3, 3);
        let s = split(&["A", "B", "C"], Some(3), Some(1), start);

        assert_eq!(resolve_workout_label(Some(&s), start), "B");
        assert_eq!(resolve_workout_label(Some(&s), start + chrono::Days::new(1)), "C");
        assert_eq!(resolve_workout_label(Some(&s), start + chrono::Days::new(2)), REST_DAY);
    }

    #[test]
    fn missing_index_defaults_to_zero() {
        let start = d(2025, 3, 3);
        let s = split(&["A", "B"], Some(2), None, start);
        assert_eq!(resolve_workout_label(Some(&s), start), "A");
    }

    #[test]
    fn missing_rest_pattern_defaults_to_day_count() {
        let start = d(2025, 3, 3);
        let s = split(&["A", "B"], None, Some(0), start);

        assert_eq!(resolve_workout_label(Some(&s), start), "A");
        assert_eq!(resolve_workout_label(Some(&s), start + chrono::Days::new(1)), "B");
        assert_eq!(resolve_workout_label(Some(&s), start + chrono::Days::new(2)), REST_DAY);
        assert_eq!(resolve_workout_label(Some(&s), start + chrono::Days::new(3)), "A");
    }

    #[test]
    fn rest_pattern_longer_than_day_list_wraps_labels() {
        // Classic PPL: six workout days, then one rest day.
        let start = d(2025, 3, 3);
        let s = split(&["Push", "Pull", "Legs"], Some(6), Some(0), start);

        let labels: Vec<String> = (0..7u64)
            .map(|i| resolve_workout_label(Some(&s), start + chrono::Days::new(i)))
            .collect();
        assert_eq!(labels, ["Push", "Pull", "Legs", "Push", "Pull", "Legs", REST_DAY]);
    }

    #[test]
    fn today_before_start_date_stays_in_cycle() {
        // Negative day offsets must use a non-negative modulo convention.
        let start = d(2025, 3, 4);
        let s = split(&["A", "B", "C"], Some(3), Some(0), start);

        // One day before the anchor sits at position 3 of the 4-day cycle.
        assert_eq!(resolve_workout_label(Some(&s), d(2025, 3, 3)), REST_DAY);
        assert_eq!(resolve_workout_label(Some(&s), d(2025, 3, 2)), "C");
    }

    #[test]
    fn stable_across_long_absences() {
        let start = d(2024, 1, 1);
        let s = split(&["Upper", "Lower"], Some(4), Some(0), start);

        // 400 days later the schedule is still a pure function of the date.
        let far = start + chrono::Days::new(400);
        let once = resolve_workout_label(Some(&s), far);
        let twice = resolve_workout_label(Some(&s), far);
        assert_eq!(once, twice);
        // 400 mod 5 = 0 → first day of the rotation.
        assert_eq!(once, "Upper");
    }
}
