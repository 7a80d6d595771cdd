use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::{
    cli::SessionCmd,
    commands::{self, parse_date, parse_instant},
    progression::compute_smart_target,
    types::{DayType, default_exercises},
    utils::{format_duration, format_weight},
};

pub async fn handle(cmd: SessionCmd, pool: &SqlitePool) -> Result<()> {
    match cmd {
        SessionCmd::Start(args) => {
            // Refuse a second concurrent session.
            if let Some(id) = commands::active_session_id(pool).await? {
                println!(
                    "{} there is already an active session (id: {})",
                    "error:".red().bold(),
                    id
                );
                return Ok(());
            }

            let label = match args.workout_type {
                Some(t) => t,
                None => commands::todays_label(pool).await?,
            };

            if label == crate::schedule::REST_DAY {
                println!(
                    "{} today is a rest day — pass --workout-type to train anyway",
                    "warning:".yellow().bold()
                );
                return Ok(());
            }

            // Pre-populate from the most recent finished session of the
            // same type, falling back to the static defaults.
            let history = commands::load_history(pool).await?;
            let exercise_names: Vec<String> = match history
                .iter()
                .find(|s| s.workout_type == label)
            {
                Some(previous) => previous.exercises.iter().map(|e| e.name.clone()).collect(),
                None => DayType::from_label(&label)
                    .map(|day| {
                        default_exercises(day)
                            .iter()
                            .map(|s| s.to_string())
                            .collect()
                    })
                    .unwrap_or_default(),
            };

            let mut tx = pool.begin().await?;

            let session_id = Uuid::new_v4().to_string();
            let now = Local::now();
            sqlx::query(
                "INSERT INTO workout_sessions (id, date, start_time, workout_type) VALUES (?, ?, ?, ?)",
            )
            .bind(&session_id)
            .bind(now.date_naive().format(commands::DATE_FMT).to_string())
            .bind(now.to_rfc3339())
            .bind(&label)
            .execute(&mut *tx)
            .await?;

            println!("{} {}", "Workout:".cyan().bold(), label.bold());
            if !exercise_names.is_empty() {
                println!("{}", "Exercises:".cyan().bold());
            }

            let today = now.date_naive();
            for (i, name) in exercise_names.iter().enumerate() {
                let ex_id = Uuid::new_v4().to_string();
                let muscle_group = name.split_once(':').map(|(prefix, _)| prefix.trim().to_string());
                sqlx::query(
                    "INSERT INTO session_exercises (id, session_id, name, muscle_group, order_index) VALUES (?, ?, ?, ?, ?)",
                )
                .bind(&ex_id)
                .bind(&session_id)
                .bind(name)
                .bind(&muscle_group)
                .bind(i as i64)
                .execute(&mut *tx)
                .await?;

                // A smart-target hint per exercise, computed from the
                // already-materialized history snapshot.
                let target = compute_smart_target(name, &history, &label, today);
                let idx = format!("{}", i + 1).yellow();
                match (target.target_weight, target.target_reps) {
                    (Some(w), Some(r)) => println!(
                        "{} • {} — target {}kg × {}",
                        idx,
                        name.bold(),
                        format_weight(w),
                        r
                    ),
                    _ => println!("{} • {} — {}", idx, name.bold(), "no history yet".dimmed()),
                }
            }

            tx.commit().await?;

            println!("\n{} session started (id: {})", "ok:".green().bold(), session_id);
            Ok(())
        }

        SessionCmd::Cancel => {
            if let Some(id) = commands::active_session_id(pool).await? {
                // Cascade removes exercises and sets.
                sqlx::query("DELETE FROM workout_sessions WHERE id = ?")
                    .bind(&id)
                    .execute(pool)
                    .await?;

                println!("{} session cancelled (id: {})", "ok:".green().bold(), id);
            } else {
                println!("{} no active session to cancel", "error:".red().bold());
            }

            Ok(())
        }

        SessionCmd::Show => {
            let Some(session_id) = commands::active_session_id(pool).await? else {
                println!("{} no active session", "error:".red().bold());
                return Ok(());
            };

            let (start_time, workout_type): (String, String) = sqlx::query_as(
                "SELECT start_time, workout_type FROM workout_sessions WHERE id = ?",
            )
            .bind(&session_id)
            .fetch_one(pool)
            .await?;

            let started = parse_instant(&start_time)?;
            let elapsed = Local::now() - started;
            println!(
                "{} {} (started {}, elapsed {})",
                "Session:".cyan().bold(),
                workout_type.bold(),
                started.format("%Y-%m-%d %H:%M"),
                format_duration(elapsed)
            );

            let history = commands::load_history(pool).await?;
            let exercises = commands::load_session_exercises(pool, &session_id).await?;
            let today = Local::now().date_naive();

            for (i, exercise) in exercises.iter().enumerate() {
                let idx = format!("{}", i + 1).yellow();
                println!("\n{} {}", idx, exercise.name.bold());

                for (set_idx, set) in exercise.sets.iter().enumerate() {
                    println!(
                        "  Set {}: {}kg × {}",
                        set_idx + 1,
                        format_weight(set.weight),
                        set.reps
                    );
                }

                let target =
                    compute_smart_target(&exercise.name, &history, &workout_type, today);
                if target.has_data {
                    println!("  {}", target.message.dimmed());
                }
            }

            Ok(())
        }

        SessionCmd::Edit { exercise, weight, reps } => {
            let Some(session_id) = commands::active_session_id(pool).await? else {
                println!("{} no active session", "error:".red().bold());
                return Ok(());
            };

            let exercises = commands::load_session_exercises(pool, &session_id).await?;
            let Some(ex) = exercise.checked_sub(1).and_then(|i| exercises.get(i)) else {
                println!(
                    "{} no exercise at index {} (session has {})",
                    "error:".red().bold(),
                    exercise,
                    exercises.len()
                );
                return Ok(());
            };

            if weight < 0.0 {
                println!("{} weight must be non-negative", "error:".red().bold());
                return Ok(());
            }

            sqlx::query(
                "INSERT INTO exercise_sets (id, session_exercise_id, weight, reps, timestamp) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&ex.id)
            .bind(weight as f64)
            .bind(reps as i64)
            .bind(Local::now().to_rfc3339())
            .execute(pool)
            .await?;

            println!(
                "{} logged {} — set {}: {}kg × {}",
                "ok:".green().bold(),
                ex.name.bold(),
                ex.sets.len() + 1,
                format_weight(weight),
                reps
            );
            Ok(())
        }

        SessionCmd::AddEx { exercise } => {
            let Some(session_id) = commands::active_session_id(pool).await? else {
                println!("{} no active session", "error:".red().bold());
                return Ok(());
            };

            let next_index: i64 = sqlx::query_scalar(
                "SELECT COALESCE(MAX(order_index) + 1, 0) FROM session_exercises WHERE session_id = ?",
            )
            .bind(&session_id)
            .fetch_one(pool)
            .await?;

            let muscle_group = exercise
                .split_once(':')
                .map(|(prefix, _)| prefix.trim().to_string());

            sqlx::query(
                "INSERT INTO session_exercises (id, session_id, name, muscle_group, order_index) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&session_id)
            .bind(&exercise)
            .bind(&muscle_group)
            .bind(next_index)
            .execute(pool)
            .await?;

            println!("{} added {}", "ok:".green().bold(), exercise.bold());
            Ok(())
        }

        SessionCmd::End => {
            let Some(session_id) = commands::active_session_id(pool).await? else {
                println!("{} no active session to end", "error:".red().bold());
                return Ok(());
            };

            let start_time: String =
                sqlx::query_scalar("SELECT start_time FROM workout_sessions WHERE id = ?")
                    .bind(&session_id)
                    .fetch_one(pool)
                    .await?;

            let started = parse_instant(&start_time)?;
            let now = Local::now();
            let duration = now - started;

            sqlx::query(
                "UPDATE workout_sessions SET end_time = ?, duration_secs = ? WHERE id = ?",
            )
            .bind(now.to_rfc3339())
            .bind(duration.num_seconds())
            .bind(&session_id)
            .execute(pool)
            .await?;

            // Finished sessions are immutable from here on.
            let exercises = commands::load_session_exercises(pool, &session_id).await?;
            let volume: f32 = exercises.iter().map(|e| e.total_volume()).sum();
            let sets: usize = exercises.iter().map(|e| e.sets.len()).sum();

            println!(
                "{} finished in {} — {} sets, {:.0} kg total volume",
                "ok:".green().bold(),
                format_duration(duration),
                sets,
                volume
            );
            Ok(())
        }

        SessionCmd::Log { date } => {
            let day = match parse_date(&date) {
                Ok(d) => d,
                Err(e) => {
                    println!("{} {}", "error:".red().bold(), e);
                    return Ok(());
                }
            };

            let rows = sqlx::query(
                r#"
                SELECT id, start_time, duration_secs, workout_type
                FROM workout_sessions
                WHERE date = ? AND end_time IS NOT NULL
                ORDER BY start_time
                "#,
            )
            .bind(day.format(commands::DATE_FMT).to_string())
            .fetch_all(pool)
            .await?;

            if rows.is_empty() {
                println!(
                    "{} no completed sessions on {}",
                    "warning:".yellow().bold(),
                    day
                );
                return Ok(());
            }

            for row in rows {
                let id: String = row.get("id");
                let workout_type: String = row.get("workout_type");
                let duration_secs: Option<i64> = row.get("duration_secs");
                let started = parse_instant(row.get("start_time"))?;

                println!(
                    "{} {} — started {}{}",
                    "Session:".cyan().bold(),
                    workout_type.bold(),
                    started.format("%H:%M"),
                    duration_secs
                        .map(|d| format!(", duration {}", format_duration(chrono::Duration::seconds(d))))
                        .unwrap_or_default()
                );

                let exercises = commands::load_session_exercises(pool, &id).await?;
                for (i, exercise) in exercises.iter().enumerate() {
                    println!("  {}. {}", i + 1, exercise.name.bold());
                    for (set_idx, set) in exercise.sets.iter().enumerate() {
                        println!(
                            "     Set {}: {}kg × {}",
                            set_idx + 1,
                            format_weight(set.weight),
                            set.reps
                        );
                    }
                }
                println!();
            }

            Ok(())
        }
    }
}
