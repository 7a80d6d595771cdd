pub mod calendar;
pub mod config;
pub mod db;
pub mod exercise;
pub mod nutrition;
pub mod profile;
pub mod session;
pub mod status;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use sqlx::{Row, SqlitePool};

use crate::models::{ExerciseEntry, Profile, SetEntry, SplitConfig, WorkoutSession};

pub const DATE_FMT: &str = "%Y-%m-%d";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .with_context(|| format!("Invalid date `{}` (expected YYYY-MM-DD)", s))
}

pub fn parse_instant(s: &str) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Local))
        .with_context(|| format!("Invalid timestamp `{}`", s))
}

/// Load the single profile row, if the user has onboarded. The split is
/// only considered configured when type, days and start date are all
/// present; anything less degrades to the legacy weekly schedule.
pub async fn load_profile(pool: &SqlitePool) -> Result<Option<Profile>> {
    let row = sqlx::query(
        r#"
        SELECT name, age, weight_kg, height_cm, gender, activity_level,
               split_type, split_days, split_rest_pattern,
               split_current_day_index, split_start_date
        FROM profiles WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else { return Ok(None) };

    let split_type: Option<String> = row.get("split_type");
    let split_days: Option<String> = row.get("split_days");
    let split_start_date: Option<String> = row.get("split_start_date");

    let split = match (split_type, split_days, split_start_date) {
        (Some(split_type), Some(days_json), Some(start)) => {
            let days: Vec<String> = serde_json::from_str(&days_json)
                .with_context(|| format!("Corrupt split_days column: {}", days_json))?;
            let rest_pattern: Option<i64> = row.get("split_rest_pattern");
            let current_day_index: Option<i64> = row.get("split_current_day_index");

            Some(SplitConfig {
                split_type,
                days,
                rest_pattern: rest_pattern.map(|r| r.max(0) as u32),
                current_day_index: current_day_index.map(|i| i.max(0) as usize),
                start_date: parse_date(&start)?,
            })
        }
        _ => None,
    };

    Ok(Some(Profile {
        name: row.get("name"),
        age: row.get::<Option<i64>, _>("age").map(|a| a as u32),
        weight_kg: row.get::<Option<f64>, _>("weight_kg").map(|w| w as f32),
        height_cm: row.get::<Option<f64>, _>("height_cm").map(|h| h as f32),
        gender: row.get("gender"),
        activity_level: row.get("activity_level"),
        split,
    }))
}

/// Materialize every finished session with its exercises and sets, most
/// recent first. This is the history snapshot handed to the progression
/// engine; the engine itself never touches the pool.
pub async fn load_history(pool: &SqlitePool) -> Result<Vec<WorkoutSession>> {
    let session_rows = sqlx::query(
        r#"
        SELECT id, date, start_time, end_time, duration_secs, workout_type
        FROM workout_sessions
        WHERE end_time IS NOT NULL
        ORDER BY date DESC, start_time DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut sessions = Vec::with_capacity(session_rows.len());
    for row in session_rows {
        let id: String = row.get("id");
        let exercises = load_session_exercises(pool, &id).await?;

        let end_time: Option<String> = row.get("end_time");
        sessions.push(WorkoutSession {
            date: parse_date(row.get("date"))?,
            start_time: parse_instant(row.get("start_time"))?,
            end_time: end_time.as_deref().map(parse_instant).transpose()?,
            duration_secs: row.get("duration_secs"),
            workout_type: row.get("workout_type"),
            exercises,
            id,
        });
    }

    Ok(sessions)
}

pub async fn load_session_exercises(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Vec<ExerciseEntry>> {
    let exercise_rows = sqlx::query(
        r#"
        SELECT id, name, muscle_group
        FROM session_exercises
        WHERE session_id = ?
        ORDER BY order_index
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    let mut exercises = Vec::with_capacity(exercise_rows.len());
    for row in exercise_rows {
        let id: String = row.get("id");
        let set_rows = sqlx::query(
            r#"
            SELECT weight, reps, timestamp
            FROM exercise_sets
            WHERE session_exercise_id = ?
            ORDER BY timestamp
            "#,
        )
        .bind(&id)
        .fetch_all(pool)
        .await?;

        let mut sets = Vec::with_capacity(set_rows.len());
        for set_row in set_rows {
            sets.push(SetEntry {
                weight: set_row.get::<f64, _>("weight") as f32,
                reps: set_row.get::<i64, _>("reps") as u32,
                timestamp: parse_instant(set_row.get("timestamp"))?,
            });
        }

        exercises.push(ExerciseEntry {
            name: row.get("name"),
            muscle_group: row.get("muscle_group"),
            sets,
            id,
        });
    }

    Ok(exercises)
}

/// The id of the in-progress session, if any. At most one session can be
/// active at a time.
pub async fn active_session_id(pool: &SqlitePool) -> Result<Option<String>> {
    Ok(
        sqlx::query_scalar("SELECT id FROM workout_sessions WHERE end_time IS NULL LIMIT 1")
            .fetch_optional(pool)
            .await?,
    )
}

/// Today's workout label for the stored profile, from the pure scheduler.
pub async fn todays_label(pool: &SqlitePool) -> Result<String> {
    let profile = load_profile(pool).await?;
    let split = profile.as_ref().and_then(|p| p.split.as_ref());
    Ok(crate::schedule::resolve_workout_label(split, Local::now().date_naive()))
}
