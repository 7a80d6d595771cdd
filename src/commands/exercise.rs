use anyhow::Result;
use chrono::{Local, NaiveDate};
use colored::Colorize;
use sqlx::SqlitePool;

use crate::{
    cli::ExerciseCmd,
    commands,
    progression::{HistoryEntry, Trend, compute_smart_target, exercise_history},
    types::best_exercise_suggestion,
    utils::format_weight,
};

fn create_ascii_graph(data: &[(NaiveDate, f32)], width: usize, height: usize, title: &str) -> Vec<String> {
    if data.is_empty() {
        return vec!["No data available".to_string()];
    }

    let min_value = data.iter().map(|(_, v)| *v).fold(f32::INFINITY, f32::min);
    let max_value = data.iter().map(|(_, v)| *v).fold(f32::NEG_INFINITY, f32::max);
    let range = max_value - min_value;

    if range == 0.0 || data.len() < 2 {
        return vec!["No variation in data".to_string()];
    }

    // Create the graph grid.
    let mut grid = vec![vec![' '; width]; height];

    for i in 0..data.len() {
        let (_, value) = data[i];
        let x = (i as f32 / (data.len() - 1) as f32 * (width - 1) as f32) as usize;
        let y = ((value - min_value) / range * (height - 1) as f32) as usize;
        let y = height - 1 - y; // Flip the y-axis.

        if y < height && x < width {
            grid[y][x] = '●';
        }

        // Draw connecting lines.
        if i > 0 {
            let prev_x = ((i - 1) as f32 / (data.len() - 1) as f32 * (width - 1) as f32) as usize;
            let prev_y = ((data[i - 1].1 - min_value) / range * (height - 1) as f32) as usize;
            let prev_y = height - 1 - prev_y;

            let dx = x as isize - prev_x as isize;
            let dy = y as isize - prev_y as isize;
            let steps = dx.abs().max(dy.abs());

            for step in 1..steps {
                let px = prev_x as isize + (dx * step / steps);
                let py = prev_y as isize + (dy * step / steps);

                if px >= 0 && px < width as isize && py >= 0 && py < height as isize {
                    let px = px as usize;
                    let py = py as usize;
                    if grid[py][px] == ' ' {
                        grid[py][px] = '·';
                    }
                }
            }
        }
    }

    // Convert the grid to strings with y-axis labels.
    let mut result = Vec::new();
    let step = range / (height - 1) as f32;

    result.push(format!("\n{}", title.bold()));
    result.push("─".repeat(width + 7));

    for (i, row) in grid.iter().enumerate() {
        let value = min_value + step * (height - 1 - i) as f32;
        result.push(format!("{:4.0} │{}", value, row.iter().collect::<String>()));
    }

    result.push(format!("     └{}", "─".repeat(width)));

    if let (Some(first), Some(last)) = (data.first(), data.last()) {
        result.push(format!("     {}  {}", first.0, last.0));
    }

    result
}

fn trend_marker(trend: Trend) -> colored::ColoredString {
    match trend {
        Trend::Progressing => "▲ progressing".green(),
        Trend::Maintaining => "→ maintaining".yellow(),
        Trend::Regressing => "▼ regressing".red(),
        Trend::Unknown => "• no trend yet".dimmed(),
    }
}

/// Distinct exercise names seen anywhere in the history, for "did you
/// mean" suggestions.
async fn known_exercise_names(pool: &SqlitePool) -> Result<Vec<String>> {
    Ok(
        sqlx::query_scalar("SELECT DISTINCT name FROM session_exercises ORDER BY name")
            .fetch_all(pool)
            .await?,
    )
}

async fn resolve_type(pool: &SqlitePool, workout_type: Option<String>) -> Result<String> {
    match workout_type {
        Some(t) => Ok(t),
        None => commands::todays_label(pool).await,
    }
}

pub async fn handle(cmd: ExerciseCmd, pool: &SqlitePool) -> Result<()> {
    match cmd {
        ExerciseCmd::Target { name, workout_type } => {
            let workout_type = resolve_type(pool, workout_type).await?;
            let history = commands::load_history(pool).await?;
            let today = Local::now().date_naive();

            let target = compute_smart_target(&name, &history, &workout_type, today);

            println!(
                "{} {} ({})",
                "Smart Target:".cyan().bold(),
                name.bold(),
                workout_type
            );
            println!("  {}", target.message);

            if let (Some(w), Some(r)) = (target.target_weight, target.target_reps) {
                println!(
                    "  {} {}kg × {}",
                    "Target today:".cyan().bold(),
                    format_weight(w).bold(),
                    r
                );
            }

            if target.has_data {
                print!("  {}", trend_marker(target.trend));
                if target.plateau_detected {
                    print!("  {}", "plateau".yellow().bold());
                }
                if target.missed_last_week {
                    print!("  {}", "missed last week".red());
                }
                println!();
            } else {
                // Maybe the name is just misspelled.
                let known = known_exercise_names(pool).await?;
                if let Some(suggestion) = best_exercise_suggestion(&name, &known) {
                    println!(
                        "  {} no history for `{}` -- did you mean: `{}`?",
                        "hint:".blue().bold(),
                        name,
                        suggestion.green()
                    );
                }
            }

            println!("  {}", target.confidence.dimmed());
            Ok(())
        }

        ExerciseCmd::History { name, workout_type, graph } => {
            let workout_type = resolve_type(pool, workout_type).await?;
            let history = commands::load_history(pool).await?;
            let today = Local::now().date_naive();

            let entries = exercise_history(&name, &history, &workout_type, today);

            if entries.is_empty() {
                println!(
                    "{} no recent history for `{}` in {} sessions",
                    "warning:".yellow().bold(),
                    name,
                    workout_type
                );

                let known = known_exercise_names(pool).await?;
                if let Some(suggestion) = best_exercise_suggestion(&name, &known) {
                    println!(
                        "{} did you mean: `{}`?",
                        "hint:".blue().bold(),
                        suggestion.green()
                    );
                }
                return Ok(());
            }

            println!(
                "{} {} ({}, last {} days)",
                "History:".cyan().bold(),
                name.bold(),
                workout_type,
                crate::progression::LOOKBACK_DAYS
            );

            for entry in &entries {
                let ago = match entry.days_ago {
                    0 => "today".to_string(),
                    1 => "1 day ago".to_string(),
                    n => format!("{} days ago", n),
                };
                println!(
                    "  {} ({}) — best {}kg × {}, {:.0} kg volume over {} sets",
                    entry.date,
                    ago.dimmed(),
                    format_weight(entry.best_set.weight),
                    entry.best_set.reps,
                    entry.total_volume,
                    entry.sets.len()
                );
            }

            println!("  {}", trend_marker(crate::progression::classify_trend(&entries)));

            if graph {
                // Oldest first for the plot.
                let mut points: Vec<(NaiveDate, f32)> = entries
                    .iter()
                    .map(|e: &HistoryEntry| (e.date, e.best_set.volume()))
                    .collect();
                points.reverse();

                let (term_width, term_height) = term_size::dimensions().unwrap_or((80, 24));
                let width = (term_width / 2).min(60);
                let height = (term_height / 2).min(15);

                let title = format!("{} best-set volume", name);
                for line in create_ascii_graph(&points, width, height, &title) {
                    println!("{}", line);
                }
            }

            Ok(())
        }
    }
}
