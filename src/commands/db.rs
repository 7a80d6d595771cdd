use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::{
    commands::{self, parse_date},
    models::{FoodLog, WaterLog, WorkoutSession},
};

/// The TOML dump format: everything needed to rebuild the local store,
/// and to carry logs between machines.
#[derive(Serialize, Deserialize)]
struct Dump {
    #[serde(default)]
    sessions: Vec<WorkoutSession>,
    #[serde(default)]
    food_logs: Vec<FoodLog>,
    #[serde(default)]
    water_logs: Vec<WaterLog>,
}

pub async fn handle(cmd: crate::cli::DbCmd, pool: &SqlitePool) -> Result<()> {
    match cmd {
        crate::cli::DbCmd::Export { file } => export(pool, file).await,
        crate::cli::DbCmd::Import { file } => import(pool, &file).await,
    }
}

async fn export(pool: &SqlitePool, file: Option<String>) -> Result<()> {
    let path = file.unwrap_or_else(|| "dump.toml".to_string());

    let sessions = commands::load_history(pool).await?;
    let food_logs = load_food_logs(pool).await?;
    let water_logs = load_water_logs(pool).await?;

    let dump = Dump { sessions, food_logs, water_logs };
    let content = toml::to_string_pretty(&dump)?;
    tokio::fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to write dump to `{}`", path))?;

    println!(
        "{} exported {} sessions, {} food logs, {} water logs to {}",
        "ok:".green().bold(),
        dump.sessions.len(),
        dump.food_logs.len(),
        dump.water_logs.len(),
        path.bold()
    );
    Ok(())
}

async fn import(pool: &SqlitePool, file: &str) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Could not read file: `{}`", file))?;

    let dump: Dump = toml::from_str(&content)
        .with_context(|| format!("Invalid dump file: `{}`", file))?;

    let mut tx = pool.begin().await?;
    let mut imported = 0;

    for session in &dump.sessions {
        let res = sqlx::query(
            r#"
            INSERT OR IGNORE INTO workout_sessions
            (id, date, start_time, end_time, duration_secs, workout_type)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(session.date.format(commands::DATE_FMT).to_string())
        .bind(session.start_time.to_rfc3339())
        .bind(session.end_time.map(|t| t.to_rfc3339()))
        .bind(session.duration_secs)
        .bind(&session.workout_type)
        .execute(&mut *tx)
        .await?;

        if res.rows_affected() == 0 {
            continue; // Already present.
        }
        imported += 1;

        for (order, exercise) in session.exercises.iter().enumerate() {
            let ex_id = if exercise.id.is_empty() {
                Uuid::new_v4().to_string()
            } else {
                exercise.id.clone()
            };

            sqlx::query(
                "INSERT OR IGNORE INTO session_exercises (id, session_id, name, muscle_group, order_index) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&ex_id)
            .bind(&session.id)
            .bind(&exercise.name)
            .bind(&exercise.muscle_group)
            .bind(order as i64)
            .execute(&mut *tx)
            .await?;

            for set in &exercise.sets {
                sqlx::query(
                    "INSERT INTO exercise_sets (id, session_exercise_id, weight, reps, timestamp) VALUES (?, ?, ?, ?, ?)",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&ex_id)
                .bind(set.weight as f64)
                .bind(set.reps as i64)
                .bind(set.timestamp.to_rfc3339())
                .execute(&mut *tx)
                .await?;
            }
        }
    }

    for log in &dump.food_logs {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO food_logs
            (id, date, timestamp, name, calories, protein, carbs, fat, amount, unit, source)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&log.id)
        .bind(log.date.format(commands::DATE_FMT).to_string())
        .bind(log.timestamp.to_rfc3339())
        .bind(&log.name)
        .bind(log.calories as f64)
        .bind(log.protein as f64)
        .bind(log.carbs as f64)
        .bind(log.fat as f64)
        .bind(log.amount as f64)
        .bind(&log.unit)
        .bind(&log.source)
        .execute(&mut *tx)
        .await?;
    }

    for log in &dump.water_logs {
        sqlx::query(
            "INSERT OR IGNORE INTO water_logs (id, date, timestamp, amount_ml) VALUES (?, ?, ?, ?)",
        )
        .bind(&log.id)
        .bind(log.date.format(commands::DATE_FMT).to_string())
        .bind(log.timestamp.to_rfc3339())
        .bind(log.amount_ml as f64)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    println!(
        "{} import complete — {} new sessions, {} food logs, {} water logs scanned",
        "ok:".green().bold(),
        imported,
        dump.food_logs.len(),
        dump.water_logs.len()
    );
    Ok(())
}

async fn load_food_logs(pool: &SqlitePool) -> Result<Vec<FoodLog>> {
    let rows = sqlx::query(
        "SELECT id, date, timestamp, name, calories, protein, carbs, fat, amount, unit, source FROM food_logs ORDER BY timestamp",
    )
    .fetch_all(pool)
    .await?;

    let mut logs = Vec::with_capacity(rows.len());
    for row in rows {
        logs.push(FoodLog {
            id: row.get("id"),
            date: parse_date(row.get("date"))?,
            timestamp: commands::parse_instant(row.get("timestamp"))?,
            name: row.get("name"),
            calories: row.get::<f64, _>("calories") as f32,
            protein: row.get::<f64, _>("protein") as f32,
            carbs: row.get::<f64, _>("carbs") as f32,
            fat: row.get::<f64, _>("fat") as f32,
            amount: row.get::<f64, _>("amount") as f32,
            unit: row.get("unit"),
            source: row.get("source"),
        });
    }
    Ok(logs)
}

async fn load_water_logs(pool: &SqlitePool) -> Result<Vec<WaterLog>> {
    let rows = sqlx::query("SELECT id, date, timestamp, amount_ml FROM water_logs ORDER BY timestamp")
        .fetch_all(pool)
        .await?;

    let mut logs = Vec::with_capacity(rows.len());
    for row in rows {
        logs.push(WaterLog {
            id: row.get("id"),
            date: parse_date(row.get("date"))?,
            timestamp: commands::parse_instant(row.get("timestamp"))?,
            amount_ml: row.get::<f64, _>("amount_ml") as f32,
        });
    }
    Ok(logs)
}
