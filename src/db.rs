use std::str::FromStr;

use anyhow::Result;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub type DB = SqlitePool;

pub async fn open(path: &str) -> Result<DB> {
    let opts = SqliteConnectOptions::from_str(path)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;

    init(&pool).await?;
    Ok(pool)
}

/// Create the schema on first run. Times are RFC 3339 TEXT, dates are
/// `YYYY-MM-DD` TEXT, ids are UUID v4 TEXT. The single profile row is
/// pinned to id 1.
async fn init(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            name TEXT NOT NULL DEFAULT '',
            age INTEGER,
            weight_kg REAL,
            height_cm REAL,
            gender TEXT,
            activity_level TEXT,
            split_type TEXT,
            split_days TEXT,
            split_rest_pattern INTEGER,
            split_current_day_index INTEGER,
            split_start_date TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS workout_sessions (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT,
            duration_secs INTEGER,
            workout_type TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS session_exercises (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL REFERENCES workout_sessions(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            muscle_group TEXT,
            order_index INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS exercise_sets (
            id TEXT PRIMARY KEY,
            session_exercise_id TEXT NOT NULL REFERENCES session_exercises(id) ON DELETE CASCADE,
            weight REAL NOT NULL,
            reps INTEGER NOT NULL,
            timestamp TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS food_logs (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            name TEXT NOT NULL,
            calories REAL NOT NULL,
            protein REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,
            fat REAL NOT NULL DEFAULT 0,
            amount REAL NOT NULL DEFAULT 0,
            unit TEXT NOT NULL DEFAULT 'g',
            source TEXT NOT NULL DEFAULT 'manual'
        );

        CREATE TABLE IF NOT EXISTS water_logs (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            amount_ml REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_date ON workout_sessions(date);
        CREATE INDEX IF NOT EXISTS idx_food_logs_date ON food_logs(date);
        CREATE INDEX IF NOT EXISTS idx_water_logs_date ON water_logs(date);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
