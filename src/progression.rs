//! Smart Target progression engine.
//!
//! Reconstructs an exercise's recent timeline from the workout history,
//! classifies its trend, detects volume plateaus, and emits a concrete
//! weight/rep suggestion with a human-readable rationale. Pure functions
//! of their inputs: no clock reads, no I/O, no shared state, safe to call
//! once per rendered exercise row.
//!
//! The engine never fails — thin or malformed history degrades to a
//! lower-confidence tier instead of an error, because a thrown error here
//! would block workout logging over an advisory hint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{SetEntry, WorkoutSession};

/// History older than this is ignored entirely.
pub const LOOKBACK_DAYS: i64 = 56;
/// A gap above this counts as "missed last week".
pub const MISSED_WEEK_GAP_DAYS: i64 = 7;
/// Smallest plate jump; all suggested weights land on this grid.
pub const WEIGHT_INCREMENT_KG: f32 = 2.5;
/// Relative best-set spread below which the lifts count as a plateau.
pub const PLATEAU_TOLERANCE: f32 = 0.05;
/// Adjacent-pair comparisons cover at most this many recent entries.
pub const TREND_WINDOW: usize = 4;
/// Plateau detection looks at exactly this many recent entries.
pub const PLATEAU_WINDOW: usize = 3;
/// Deload multiplier applied on plateau or regression.
pub const DELOAD_FACTOR: f32 = 0.9;

/// Direction of the best-set volume over the recent trend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Progressing,
    Maintaining,
    Regressing,
    /// Fewer than two comparable sessions.
    Unknown,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Progressing => write!(f, "progressing"),
            Self::Maintaining => write!(f, "maintaining"),
            Self::Regressing => write!(f, "regressing"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One occurrence of the queried exercise inside the lookback window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    /// Whole days between the session date and `today`.
    pub days_ago: i64,
    pub sets: Vec<SetEntry>,
    /// The set with the highest weight × reps product (first wins ties).
    pub best_set: SetEntry,
    /// Sum of weight × reps over every set of that session's instance.
    pub total_volume: f32,
}

/// The advisory output shown next to an exercise row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartTarget {
    pub has_data: bool,
    pub sessions_analyzed: usize,
    pub last_entry: Option<HistoryEntry>,
    pub days_since_last: Option<i64>,
    pub missed_last_week: bool,
    pub trend: Trend,
    pub plateau_detected: bool,
    pub target_weight: Option<f32>,
    pub target_reps: Option<u32>,
    pub message: String,
    pub confidence: String,
}

/// Round to the nearest plate increment.
pub fn round_to_plate(weight: f32) -> f32 {
    (weight / WEIGHT_INCREMENT_KG).round() * WEIGHT_INCREMENT_KG
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Extract the exercise's relevant timeline from the full history.
///
/// Only sessions whose `workout_type` equals `workout_type` exactly are
/// considered — comparing volumes across workout types would compare
/// incomparable muscle groups. Sessions outside the lookback window, or
/// without a matching non-empty exercise, are skipped. The result is
/// sorted most recent first.
pub fn exercise_history(
    exercise_name: &str,
    history: &[WorkoutSession],
    workout_type: &str,
    today: NaiveDate,
) -> Vec<HistoryEntry> {
    let wanted = normalize_name(exercise_name);
    if wanted.is_empty() {
        return Vec::new();
    }

    let mut entries: Vec<HistoryEntry> = history
        .iter()
        .filter(|session| session.workout_type == workout_type)
        .filter_map(|session| {
            let days_ago = (today - session.date).num_days();
            if !(0..=LOOKBACK_DAYS).contains(&days_ago) {
                return None;
            }

            let exercise = session
                .exercises
                .iter()
                .find(|ex| normalize_name(&ex.name) == wanted)?;
            if exercise.sets.is_empty() {
                return None;
            }

            // Strict `>` keeps the first set on ties.
            let best_set = exercise
                .sets
                .iter()
                .fold(None::<&SetEntry>, |best, set| match best {
                    Some(b) if set.volume() > b.volume() => Some(set),
                    Some(b) => Some(b),
                    None => Some(set),
                })?
                .clone();

            let total_volume = exercise.total_volume();

            Some(HistoryEntry {
                date: session.date,
                days_ago,
                sets: exercise.sets.clone(),
                best_set,
                total_volume,
            })
        })
        .collect();

    entries.sort_by_key(|e| e.days_ago);
    entries
}

/// Classify the trend over up to the `TREND_WINDOW` most recent entries.
/// Entries must be sorted most recent first.
pub fn classify_trend(entries: &[HistoryEntry]) -> Trend {
    if entries.len() < 2 {
        return Trend::Unknown;
    }

    let window = &entries[..entries.len().min(TREND_WINDOW)];
    let mut improving = 0u32;
    let mut declining = 0u32;

    for pair in window.windows(2) {
        // pair[0] is the more recent of the two.
        let current = pair[0].best_set.volume();
        let previous = pair[1].best_set.volume();
        if current > previous {
            improving += 1;
        } else if current < previous {
            declining += 1;
        }
    }

    if improving > declining {
        Trend::Progressing
    } else if declining > improving {
        Trend::Regressing
    } else {
        Trend::Maintaining
    }
}

/// Flag a plateau when the best-set volumes of the `PLATEAU_WINDOW` most
/// recent entries sit within `PLATEAU_TOLERANCE` of each other.
pub fn detect_plateau(entries: &[HistoryEntry]) -> bool {
    if entries.len() < PLATEAU_WINDOW {
        return false;
    }

    let volumes: Vec<f32> = entries[..PLATEAU_WINDOW]
        .iter()
        .map(|e| e.best_set.volume())
        .collect();

    let max = volumes.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let min = volumes.iter().cloned().fold(f32::INFINITY, f32::min);

    if max <= 0.0 {
        return false;
    }

    (max - min) / max < PLATEAU_TOLERANCE
}

/// Compute the Smart Target for one exercise.
///
/// The suggestion tier depends on how many comparable sessions exist in
/// the lookback window; every input-degradation case falls through to a
/// less confident tier rather than erroring.
pub fn compute_smart_target(
    exercise_name: &str,
    history: &[WorkoutSession],
    workout_type: &str,
    today: NaiveDate,
) -> SmartTarget {
    let entries = exercise_history(exercise_name, history, workout_type, today);

    if entries.is_empty() {
        return SmartTarget {
            has_data: false,
            sessions_analyzed: 0,
            last_entry: None,
            days_since_last: None,
            missed_last_week: false,
            trend: Trend::Unknown,
            plateau_detected: false,
            target_weight: None,
            target_reps: None,
            message: format!(
                "New exercise — log {} today to start tracking progress",
                exercise_name.trim()
            ),
            confidence: "No data yet".to_string(),
        };
    }

    let last = entries[0].clone();
    let gap = last.days_ago;
    let missed_last_week = gap > MISSED_WEEK_GAP_DAYS;
    let last_weight = last.best_set.weight;
    let last_reps = last.best_set.reps;

    let trend = classify_trend(&entries);
    let plateau_detected = detect_plateau(&entries);

    let (target_weight, target_reps, message, confidence) = match entries.len() {
        1 => {
            let when = if gap > 0 {
                format!(", {} days ago", gap)
            } else {
                String::new()
            };
            let advice = if missed_last_week {
                "You missed last week — ease back in and match it."
            } else {
                "Match or beat it today."
            };
            (
                last_weight,
                last_reps,
                format!(
                    "Last time: {}kg × {}{}. {}",
                    last_weight, last_reps, when, advice
                ),
                "First session logged".to_string(),
            )
        }

        2..=3 => {
            let (w, r, msg) = if missed_last_week {
                (
                    last_weight,
                    last_reps,
                    format!(
                        "Back after {} days — match {}kg × {} today.",
                        gap, last_weight, last_reps
                    ),
                )
            } else if trend == Trend::Progressing {
                let w = last_weight + WEIGHT_INCREMENT_KG;
                (
                    w,
                    last_reps,
                    format!("You're progressing — go for {}kg × {} today.", w, last_reps),
                )
            } else {
                (
                    last_weight,
                    last_reps,
                    format!(
                        "Stay consistent — match {}kg × {} today.",
                        last_weight, last_reps
                    ),
                )
            };
            (w, r, msg, "Building data...".to_string())
        }

        n => {
            // Priority-ordered rules; the first match wins.
            let (w, r, msg) = if missed_last_week {
                (
                    last_weight,
                    last_reps,
                    format!(
                        "Back after {} days — match {}kg × {} today.",
                        gap, last_weight, last_reps
                    ),
                )
            } else if plateau_detected {
                let w = round_to_plate(last_weight * DELOAD_FACTOR);
                (
                    w,
                    last_reps,
                    format!(
                        "Plateau detected — deload to {}kg × {} or swap in a variation.",
                        w, last_reps
                    ),
                )
            } else if trend == Trend::Progressing {
                let w = last_weight + WEIGHT_INCREMENT_KG;
                (
                    w,
                    last_reps,
                    format!("You're progressing — go for {}kg × {} today.", w, last_reps),
                )
            } else if trend == Trend::Regressing {
                let w = round_to_plate(last_weight * DELOAD_FACTOR);
                let r = last_reps + 2;
                (
                    w,
                    r,
                    format!(
                        "Trending down — drop to {}kg × {}, check your form and rebuild.",
                        w, r
                    ),
                )
            } else {
                let r = last_reps + 1;
                (
                    last_weight,
                    r,
                    format!(
                        "Holding steady — same {}kg, push for {} reps today.",
                        last_weight, r
                    ),
                )
            };
            (w, r, msg, format!("Based on {} sessions", n))
        }
    };

    SmartTarget {
        has_data: true,
        sessions_analyzed: entries.len(),
        days_since_last: Some(gap),
        missed_last_week,
        trend,
        plateau_detected,
        target_weight: Some(target_weight),
        target_reps: Some(target_reps),
        message,
        confidence,
        last_entry: Some(last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseEntry;
    use chrono::{Local, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    fn session(days_ago: u64, workout_type: &str, name: &str, sets: &[(f32, u32)]) -> WorkoutSession {
        let date = today() - chrono::Days::new(days_ago);
        let start = Local.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        WorkoutSession {
            id: format!("s-{}-{}", workout_type, days_ago),
            date,
            start_time: start,
            end_time: Some(start),
            duration_secs: Some(3600),
            workout_type: workout_type.to_string(),
            exercises: vec![ExerciseEntry {
                id: "e1".to_string(),
                name: name.to_string(),
                muscle_group: None,
                sets: sets
                    .iter()
                    .map(|&(weight, reps)| SetEntry { weight, reps, timestamp: start })
                    .collect(),
            }],
        }
    }

    #[test]
    fn empty_history_has_no_target() {
        let target = compute_smart_target("Bench Press", &[], "Push", today());
        assert!(!target.has_data);
        assert_eq!(target.sessions_analyzed, 0);
        assert!(target.target_weight.is_none());
        assert!(target.target_reps.is_none());
        assert_eq!(target.trend, Trend::Unknown);
        assert_eq!(target.confidence, "No data yet");
    }

    #[test]
    fn single_entry_repeats_last_performance() {
        let history = vec![session(3, "Push", "Bench Press", &[(50.0, 10)])];
        let target = compute_smart_target("Bench Press", &history, "Push", today());

        assert!(target.has_data);
        assert_eq!(target.target_weight, Some(50.0));
        assert_eq!(target.target_reps, Some(10));
        assert!(target.message.contains("3 days ago"));
        assert!(!target.missed_last_week);
        assert_eq!(target.confidence, "First session logged");
    }

    #[test]
    fn single_entry_long_gap_flags_missed_week() {
        let history = vec![session(10, "Push", "Bench Press", &[(50.0, 10)])];
        let target = compute_smart_target("Bench Press", &history, "Push", today());

        assert!(target.missed_last_week);
        assert_eq!(target.target_weight, Some(50.0));
        assert!(target.message.contains("missed last week"));
    }

    #[test]
    fn progressing_trend_adds_one_increment() {
        // Strictly increasing best-set volume, most recent last in time.
        let history = vec![
            session(2, "Push", "Bench Press", &[(47.5, 10)]),
            session(5, "Push", "Bench Press", &[(45.0, 10)]),
            session(8, "Push", "Bench Press", &[(42.5, 10)]),
            session(11, "Push", "Bench Press", &[(40.0, 10)]),
        ];
        let target = compute_smart_target("Bench Press", &history, "Push", today());

        assert_eq!(target.trend, Trend::Progressing);
        assert!(!target.plateau_detected);
        assert_eq!(target.target_weight, Some(50.0));
        assert_eq!(target.target_reps, Some(10));
        assert_eq!(target.confidence, "Based on 4 sessions");
    }

    #[test]
    fn plateau_triggers_deload() {
        // Three most recent best-set volumes within 5%: 500, 510, 495.
        let history = vec![
            session(2, "Push", "Bench Press", &[(50.0, 10)]),
            session(5, "Push", "Bench Press", &[(51.0, 10)]),
            session(7, "Push", "Bench Press", &[(49.5, 10)]),
            session(10, "Push", "Bench Press", &[(60.0, 10)]),
        ];
        let target = compute_smart_target("Bench Press", &history, "Push", today());

        assert!(target.plateau_detected);
        // round(50 × 0.9 / 2.5) × 2.5 = 45.
        assert_eq!(target.target_weight, Some(45.0));
        assert!(target.message.contains("Plateau"));
    }

    #[test]
    fn regressing_trend_deloads_and_adds_reps() {
        let history = vec![
            session(2, "Push", "Bench Press", &[(40.0, 10)]),
            session(5, "Push", "Bench Press", &[(45.0, 10)]),
            session(8, "Push", "Bench Press", &[(50.0, 10)]),
            session(11, "Push", "Bench Press", &[(55.0, 10)]),
        ];
        let target = compute_smart_target("Bench Press", &history, "Push", today());

        assert_eq!(target.trend, Trend::Regressing);
        // 40 × 0.9 = 36, snapped to the 2.5 grid = 35; reps 10 + 2.
        assert_eq!(target.target_weight, Some(35.0));
        assert_eq!(target.target_reps, Some(12));
    }

    #[test]
    fn maintaining_trend_adds_one_rep() {
        // Alternating volumes: one improving pair, one declining, one flat.
        let history = vec![
            session(2, "Push", "Bench Press", &[(50.0, 10)]),
            session(5, "Push", "Bench Press", &[(45.0, 10)]),
            session(8, "Push", "Bench Press", &[(50.0, 10)]),
            session(11, "Push", "Bench Press", &[(50.0, 10)]),
        ];
        let target = compute_smart_target("Bench Press", &history, "Push", today());

        assert_eq!(target.trend, Trend::Maintaining);
        assert!(!target.plateau_detected);
        assert_eq!(target.target_weight, Some(50.0));
        assert_eq!(target.target_reps, Some(11));
    }

    #[test]
    fn long_gap_outranks_plateau_and_trend() {
        let history = vec![
            session(9, "Push", "Bench Press", &[(50.0, 10)]),
            session(12, "Push", "Bench Press", &[(50.5, 10)]),
            session(14, "Push", "Bench Press", &[(49.5, 10)]),
            session(17, "Push", "Bench Press", &[(49.0, 10)]),
        ];
        let target = compute_smart_target("Bench Press", &history, "Push", today());

        assert!(target.missed_last_week);
        assert_eq!(target.target_weight, Some(50.0));
        assert_eq!(target.target_reps, Some(10));
        assert!(target.message.contains("Back after 9 days"));
    }

    #[test]
    fn two_entries_progressing_adds_increment() {
        let history = vec![
            session(2, "Push", "Bench Press", &[(42.5, 10)]),
            session(5, "Push", "Bench Press", &[(40.0, 10)]),
        ];
        let target = compute_smart_target("Bench Press", &history, "Push", today());

        assert_eq!(target.trend, Trend::Progressing);
        assert_eq!(target.target_weight, Some(45.0));
        assert_eq!(target.confidence, "Building data...");
    }

    #[test]
    fn two_entries_flat_repeats_last() {
        let history = vec![
            session(2, "Push", "Bench Press", &[(40.0, 10)]),
            session(5, "Push", "Bench Press", &[(40.0, 10)]),
        ];
        let target = compute_smart_target("Bench Press", &history, "Push", today());

        assert_eq!(target.trend, Trend::Maintaining);
        assert_eq!(target.target_weight, Some(40.0));
        assert_eq!(target.target_reps, Some(10));
    }

    #[test]
    fn name_match_ignores_case_and_whitespace() {
        let history = vec![session(3, "Push", "  BENCH press ", &[(50.0, 10)])];

        for query in ["Bench Press", " bench press ", "BENCH PRESS"] {
            let entries = exercise_history(query, &history, "Push", today());
            assert_eq!(entries.len(), 1, "query {:?} should match", query);
        }
    }

    #[test]
    fn other_workout_types_never_contaminate() {
        // Same exercise name under a different session type must not count.
        let history = vec![
            session(2, "Pull", "Cable Row", &[(60.0, 10)]),
            session(5, "Push", "Cable Row", &[(30.0, 10)]),
        ];
        let entries = exercise_history("Cable Row", &history, "Push", today());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].best_set.weight, 30.0);
    }

    #[test]
    fn entries_older_than_lookback_are_ignored() {
        let history = vec![
            session(3, "Push", "Bench Press", &[(50.0, 10)]),
            session(60, "Push", "Bench Press", &[(80.0, 10)]),
        ];
        let entries = exercise_history("Bench Press", &history, "Push", today());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].best_set.weight, 50.0);
    }

    #[test]
    fn best_set_keeps_first_on_tie() {
        let history = vec![session(
            1,
            "Push",
            "Bench Press",
            &[(50.0, 10), (100.0, 5), (25.0, 20)],
        )];
        let entries = exercise_history("Bench Press", &history, "Push", today());

        // All three sets have volume 500; the first encountered wins.
        assert_eq!(entries[0].best_set.weight, 50.0);
        assert_eq!(entries[0].best_set.reps, 10);
        assert_eq!(entries[0].total_volume, 1500.0);
    }

    #[test]
    fn exercises_with_no_sets_are_skipped() {
        let s = session(2, "Push", "Bench Press", &[]);
        let entries = exercise_history("Bench Press", &[s], "Push", today());
        assert!(entries.is_empty());
    }

    #[test]
    fn trend_needs_two_entries() {
        let history = vec![session(2, "Push", "Bench Press", &[(50.0, 10)])];
        let entries = exercise_history("Bench Press", &history, "Push", today());
        assert_eq!(classify_trend(&entries), Trend::Unknown);
    }

    #[test]
    fn trend_window_caps_at_four_entries() {
        // Four recent declines, then ancient monster numbers: the window
        // only sees the declines.
        let history = vec![
            session(2, "Push", "Bench Press", &[(40.0, 10)]),
            session(5, "Push", "Bench Press", &[(42.5, 10)]),
            session(8, "Push", "Bench Press", &[(45.0, 10)]),
            session(11, "Push", "Bench Press", &[(47.5, 10)]),
            session(14, "Push", "Bench Press", &[(10.0, 10)]),
            session(17, "Push", "Bench Press", &[(10.0, 10)]),
        ];
        let entries = exercise_history("Bench Press", &history, "Push", today());
        assert_eq!(classify_trend(&entries), Trend::Regressing);
    }

    #[test]
    fn plateau_needs_three_entries() {
        let history = vec![
            session(2, "Push", "Bench Press", &[(50.0, 10)]),
            session(5, "Push", "Bench Press", &[(50.0, 10)]),
        ];
        let entries = exercise_history("Bench Press", &history, "Push", today());
        assert!(!detect_plateau(&entries));
    }

    #[test]
    fn spread_above_tolerance_is_not_a_plateau() {
        let history = vec![
            session(2, "Push", "Bench Press", &[(50.0, 10)]),
            session(5, "Push", "Bench Press", &[(45.0, 10)]),
            session(8, "Push", "Bench Press", &[(50.0, 10)]),
        ];
        let entries = exercise_history("Bench Press", &history, "Push", today());
        assert!(!detect_plateau(&entries));
    }

    #[test]
    fn plate_rounding_snaps_to_two_point_five() {
        assert_eq!(round_to_plate(43.4), 42.5);
        assert_eq!(round_to_plate(43.8), 45.0);
        assert_eq!(round_to_plate(45.0), 45.0);
        assert_eq!(round_to_plate(0.4), 0.0);
    }
}
