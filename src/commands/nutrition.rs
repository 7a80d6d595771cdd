use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use itertools::Itertools;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::{
    cli::FoodCmd,
    commands::{self, parse_date},
    types::{Config, config_path},
};

// Fallback goals when the config has none set.
const DEFAULT_CALORIE_GOAL: f32 = 2000.0;
const DEFAULT_PROTEIN_GOAL: f32 = 150.0;
const DEFAULT_WATER_GOAL_ML: f32 = 3000.0;

pub async fn handle_food(cmd: FoodCmd, pool: &SqlitePool) -> Result<()> {
    match cmd {
        FoodCmd::Add { name, calories, protein, carbs, fat, amount, unit } => {
            if unit != "g" && unit != "ml" {
                println!("{} unit must be `g` or `ml`", "error:".red().bold());
                return Ok(());
            }
            if calories < 0.0 {
                println!("{} calories must be non-negative", "error:".red().bold());
                return Ok(());
            }

            let now = Local::now();
            sqlx::query(
                r#"
                INSERT INTO food_logs
                (id, date, timestamp, name, calories, protein, carbs, fat, amount, unit, source)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'manual')
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(now.date_naive().format(commands::DATE_FMT).to_string())
            .bind(now.to_rfc3339())
            .bind(&name)
            .bind(calories as f64)
            .bind(protein as f64)
            .bind(carbs as f64)
            .bind(fat as f64)
            .bind(amount as f64)
            .bind(&unit)
            .execute(pool)
            .await?;

            println!(
                "{} logged {} — {:.0} kcal, {:.0}g protein",
                "ok:".green().bold(),
                name.bold(),
                calories,
                protein
            );
            Ok(())
        }

        FoodCmd::List { date } => {
            let day = match resolve_day(date) {
                Ok(d) => d,
                Err(e) => {
                    println!("{} {}", "error:".red().bold(), e);
                    return Ok(());
                }
            };

            let rows = sqlx::query(
                r#"
                SELECT timestamp, name, calories, protein, source
                FROM food_logs
                WHERE date = ?
                ORDER BY timestamp
                "#,
            )
            .bind(day.format(commands::DATE_FMT).to_string())
            .fetch_all(pool)
            .await?;

            if rows.is_empty() {
                println!("{} nothing logged on {}", "warning:".yellow().bold(), day);
                return Ok(());
            }

            println!("{} {}", "Food log:".cyan().bold(), day);
            for row in &rows {
                let ts = commands::parse_instant(row.get("timestamp"))?;
                let name: String = row.get("name");
                let calories: f64 = row.get("calories");
                let protein: f64 = row.get("protein");
                let source: String = row.get("source");

                let tag = if source == "manual" {
                    String::new()
                } else {
                    format!(" [{}]", source)
                };
                println!(
                    "  {} {} — {:.0} kcal, {:.0}g protein{}",
                    ts.format("%H:%M").to_string().dimmed(),
                    name.bold(),
                    calories,
                    protein,
                    tag.dimmed()
                );
            }

            Ok(())
        }
    }
}

pub async fn handle_water(amount: f32, pool: &SqlitePool) -> Result<()> {
    if amount <= 0.0 {
        println!("{} amount must be positive", "error:".red().bold());
        return Ok(());
    }

    let now = Local::now();
    sqlx::query("INSERT INTO water_logs (id, date, timestamp, amount_ml) VALUES (?, ?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(now.date_naive().format(commands::DATE_FMT).to_string())
        .bind(now.to_rfc3339())
        .bind(amount as f64)
        .execute(pool)
        .await?;

    let total: f64 = sqlx::query_scalar("SELECT COALESCE(SUM(amount_ml), 0) FROM water_logs WHERE date = ?")
        .bind(now.date_naive().format(commands::DATE_FMT).to_string())
        .fetch_one(pool)
        .await?;

    println!(
        "{} logged {:.0} ml — {:.0} ml today",
        "ok:".green().bold(),
        amount,
        total
    );
    Ok(())
}

pub async fn handle_day(date: Option<String>, pool: &SqlitePool) -> Result<()> {
    let day = match resolve_day(date) {
        Ok(d) => d,
        Err(e) => {
            println!("{} {}", "error:".red().bold(), e);
            return Ok(());
        }
    };
    let day_key = day.format(commands::DATE_FMT).to_string();

    let (calories, protein, carbs, fat): (f64, f64, f64, f64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(calories), 0), COALESCE(SUM(protein), 0),
               COALESCE(SUM(carbs), 0), COALESCE(SUM(fat), 0)
        FROM food_logs WHERE date = ?
        "#,
    )
    .bind(&day_key)
    .fetch_one(pool)
    .await?;

    let water: f64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(amount_ml), 0) FROM water_logs WHERE date = ?")
            .bind(&day_key)
            .fetch_one(pool)
            .await?;

    let food_names: Vec<String> =
        sqlx::query_scalar("SELECT name FROM food_logs WHERE date = ? ORDER BY timestamp")
            .bind(&day_key)
            .fetch_all(pool)
            .await?;

    let cfg = Config::load(&config_path()?)?;
    let calorie_goal = cfg.goal("calorie_goal", DEFAULT_CALORIE_GOAL);
    let protein_goal = cfg.goal("protein_goal", DEFAULT_PROTEIN_GOAL);
    let water_goal = cfg.goal("water_goal_ml", DEFAULT_WATER_GOAL_ML);

    println!("{} {}", "Nutrition:".cyan().bold(), day);
    print_goal_line("Calories", calories as f32, calorie_goal, "kcal");
    print_goal_line("Protein", protein as f32, protein_goal, "g");
    println!("{}: {:.0} g", "Carbs".cyan().bold(), carbs);
    println!("{}: {:.0} g", "Fat".cyan().bold(), fat);
    print_goal_line("Water", water as f32, water_goal, "ml");

    if !food_names.is_empty() {
        println!("\n{} {}", "Eaten:".cyan().bold(), food_names.iter().join(", "));
    }

    Ok(())
}

fn resolve_day(date: Option<String>) -> Result<chrono::NaiveDate> {
    match date {
        Some(s) => parse_date(&s),
        None => Ok(Local::now().date_naive()),
    }
}

fn print_goal_line(label: &str, value: f32, goal: f32, unit: &str) {
    let pct = if goal > 0.0 { value / goal * 100.0 } else { 0.0 };
    let pct_str = format!("{:.0}%", pct);
    let pct_colored = if pct >= 100.0 {
        pct_str.green()
    } else if pct >= 50.0 {
        pct_str.yellow()
    } else {
        pct_str.red()
    };

    println!(
        "{}: {:.0} / {:.0} {} ({})",
        label.cyan().bold(),
        value,
        goal,
        unit,
        pct_colored
    );
}
