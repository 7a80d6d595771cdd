use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use colored::Colorize;
use sqlx::{Row, SqlitePool};

use crate::{
    commands::{self, parse_instant},
    schedule::{REST_DAY, resolve_workout_label},
    utils::format_duration_short,
};

/// Month view: projected split labels from the scheduler, with days that
/// have logged sessions highlighted.
pub async fn handle(pool: &SqlitePool, year: Option<i32>, month: Option<u32>) -> Result<()> {
    let now = chrono::Local::now();
    let year = year.unwrap_or(now.year());
    let month = month.unwrap_or(now.month());

    if !(1..=12).contains(&month) {
        println!("{} month must be between 1 and 12", "error:".red().bold());
        return Ok(());
    }

    let first_day = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let last_day = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    }
    .pred_opt()
    .unwrap();

    let profile = commands::load_profile(pool).await?;
    let split = profile.as_ref().and_then(|p| p.split.as_ref());

    // Logged sessions in the month, grouped by day of month.
    let rows = sqlx::query(
        r#"
        SELECT date, start_time, duration_secs, workout_type
        FROM workout_sessions
        WHERE date >= ? AND date <= ? AND end_time IS NOT NULL
        ORDER BY date, start_time
        "#,
    )
    .bind(first_day.format(commands::DATE_FMT).to_string())
    .bind(last_day.format(commands::DATE_FMT).to_string())
    .fetch_all(pool)
    .await?;

    let mut sessions_by_day: std::collections::HashMap<u32, Vec<(String, Option<i64>, String)>> =
        std::collections::HashMap::new();
    for row in &rows {
        let date = commands::parse_date(row.get("date"))?;
        sessions_by_day.entry(date.day()).or_default().push((
            row.get("start_time"),
            row.get("duration_secs"),
            row.get("workout_type"),
        ));
    }

    // Print calendar header.
    println!("\n{}", first_day.format("%B %Y").to_string().bold().cyan());
    println!("{}", "Su Mo Tu We Th Fr Sa".dimmed());

    let first_weekday = first_day.weekday().num_days_from_sunday() as usize;
    print!("{}", "   ".repeat(first_weekday));

    for day in 1..=last_day.day() {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let label = resolve_workout_label(split, date);

        if sessions_by_day.contains_key(&day) {
            // Day has logged sessions.
            print!("{:2} ", day.to_string().green().bold());
        } else if label == REST_DAY {
            print!("{:2} ", day.to_string().dimmed());
        } else {
            print!("{:2} ", day);
        }

        // New line at end of week.
        if (first_weekday + day as usize) % 7 == 0 {
            println!();
        }
    }
    println!("\n");

    // Legend: the projected rotation for the rest of the month.
    if let Some(split) = split {
        println!(
            "{} {} ({}), rest after {} days",
            "Split:".bold().cyan(),
            split.split_type,
            split.days.join("/"),
            split.rest_pattern.unwrap_or(split.days.len() as u32)
        );
        println!();
    }

    if !rows.is_empty() {
        println!("{}", "Sessions:".bold().cyan());
        for row in &rows {
            let started = parse_instant(row.get("start_time"))?;
            let duration_secs: Option<i64> = row.get("duration_secs");
            let workout_type: String = row.get("workout_type");

            let duration = duration_secs
                .map(|d| format!(" ({})", format_duration_short(chrono::Duration::seconds(d))))
                .unwrap_or_default();

            println!(
                "  {} {}{}",
                started.format("%a %b %d %H:%M").to_string().green(),
                workout_type.bold(),
                duration
            );
        }
    }

    Ok(())
}
