use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use sqlx::SqlitePool;

use crate::{
    commands,
    progression::compute_smart_target,
    schedule::REST_DAY,
    types::{DayType, default_exercises},
    utils::format_weight,
};

/// Today's resolved workout plus a smart-target line per planned
/// exercise. The plan comes from the active session if one is running,
/// otherwise from the defaults for today's label.
pub async fn handle(pool: &SqlitePool) -> Result<()> {
    let label = commands::todays_label(pool).await?;
    let today = Local::now().date_naive();

    println!(
        "{} {} — {}",
        "Today:".cyan().bold(),
        today.format("%A, %b %d"),
        label.bold()
    );

    if label == REST_DAY {
        println!("{}", "Recover well. No targets today.".dimmed());
        return Ok(());
    }

    let active = commands::active_session_id(pool).await?;
    let planned: Vec<String> = match &active {
        Some(session_id) => commands::load_session_exercises(pool, session_id)
            .await?
            .into_iter()
            .map(|e| e.name)
            .collect(),
        None => {
            let history = commands::load_history(pool).await?;
            match history.iter().find(|s| s.workout_type == label) {
                Some(previous) => previous.exercises.iter().map(|e| e.name.clone()).collect(),
                None => DayType::from_label(&label)
                    .map(|day| default_exercises(day).iter().map(|s| s.to_string()).collect())
                    .unwrap_or_default(),
            }
        }
    };

    if let Some(id) = &active {
        println!("{} session in progress (id: {})", "info:".blue().bold(), id);
    }

    if planned.is_empty() {
        println!(
            "{} nothing planned for {} yet — `session start` will create an empty session",
            "warning:".yellow().bold(),
            label
        );
        return Ok(());
    }

    let history = commands::load_history(pool).await?;

    println!("\n{}", "Smart Targets:".cyan().bold());
    for (i, name) in planned.iter().enumerate() {
        let target = compute_smart_target(name, &history, &label, today);
        let idx = format!("{}", i + 1).yellow();

        match (target.target_weight, target.target_reps) {
            (Some(w), Some(r)) => {
                print!(
                    "{} • {} — {}kg × {}",
                    idx,
                    name.bold(),
                    format_weight(w).bold(),
                    r
                );
                if target.plateau_detected {
                    print!(" {}", "plateau".yellow().bold());
                }
                if target.missed_last_week {
                    print!(" {}", "missed".red());
                }
                println!();
            }
            _ => println!("{} • {} — {}", idx, name.bold(), "no history yet".dimmed()),
        }
        println!("    {}", target.message.dimmed());
    }

    Ok(())
}
