use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use sqlx::SqlitePool;

use crate::{
    cli::{ProfileCmd, SplitCmd},
    commands::{self, parse_date},
    types::PRESET_SPLITS,
};

const ACTIVITY_LEVELS: &[&str] = &["sedentary", "light", "moderate", "active", "very-active"];

/// Make sure the single profile row exists before updating columns.
async fn ensure_profile_row(pool: &SqlitePool) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO profiles (id) VALUES (1)")
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn handle(cmd: ProfileCmd, pool: &SqlitePool) -> Result<()> {
    match cmd {
        ProfileCmd::Show => {
            let Some(profile) = commands::load_profile(pool).await? else {
                println!(
                    "{} no profile yet — run `profile set --name NAME` to create one",
                    "warning:".yellow().bold()
                );
                return Ok(());
            };

            println!("{} {}", "Profile:".cyan().bold(), profile.name.bold());
            if let Some(age) = profile.age {
                println!("  age: {}", age);
            }
            if let Some(weight) = profile.weight_kg {
                println!("  weight: {} kg", weight);
            }
            if let Some(height) = profile.height_cm {
                println!("  height: {} cm", height);
            }
            if let Some(gender) = &profile.gender {
                println!("  gender: {}", gender);
            }
            if let Some(activity) = &profile.activity_level {
                println!("  activity: {}", activity);
            }

            match &profile.split {
                Some(split) => {
                    println!("\n{} {}", "Split:".cyan().bold(), split.split_type.bold());
                    println!("  days: {}", split.days.join(", "));
                    println!(
                        "  rest after {} workout days",
                        split.rest_pattern.unwrap_or(split.days.len() as u32)
                    );
                    println!("  anchored to {}", split.start_date);

                    let today = Local::now().date_naive();
                    println!(
                        "  today resolves to: {}",
                        crate::schedule::resolve_workout_label(Some(split), today).bold()
                    );
                }
                None => {
                    println!(
                        "\n{} none configured — on the legacy weekly schedule",
                        "Split:".cyan().bold()
                    );
                }
            }

            Ok(())
        }

        ProfileCmd::Set { name, age, weight, height, gender, activity } => {
            if let Some(activity) = &activity {
                if !ACTIVITY_LEVELS.contains(&activity.as_str()) {
                    println!(
                        "{} unknown activity level `{}` (expected one of: {})",
                        "error:".red().bold(),
                        activity,
                        ACTIVITY_LEVELS.join(", ")
                    );
                    return Ok(());
                }
            }

            ensure_profile_row(pool).await?;

            // Only overwrite the columns that were passed.
            sqlx::query(
                r#"
                UPDATE profiles SET
                    name = COALESCE(?, name),
                    age = COALESCE(?, age),
                    weight_kg = COALESCE(?, weight_kg),
                    height_cm = COALESCE(?, height_cm),
                    gender = COALESCE(?, gender),
                    activity_level = COALESCE(?, activity_level)
                WHERE id = 1
                "#,
            )
            .bind(&name)
            .bind(age.map(|a| a as i64))
            .bind(weight.map(|w| w as f64))
            .bind(height.map(|h| h as f64))
            .bind(&gender)
            .bind(&activity)
            .execute(pool)
            .await?;

            println!("{} profile updated", "ok:".green().bold());
            Ok(())
        }

        ProfileCmd::Split(cmd) => handle_split(cmd, pool).await,
    }
}

async fn handle_split(cmd: SplitCmd, pool: &SqlitePool) -> Result<()> {
    match cmd {
        SplitCmd::Set { split_type, days, rest_pattern, start_index, start_date } => {
            // Resolve preset or custom day labels.
            let (days, rest_pattern, display_name) = if split_type == "custom" {
                let Some(days) = days.filter(|d| !d.is_empty()) else {
                    println!(
                        "{} a custom split needs --days, e.g. --days Push,Pull,Legs",
                        "error:".red().bold()
                    );
                    return Ok(());
                };
                (days, rest_pattern, "custom")
            } else {
                match PRESET_SPLITS.get(split_type.as_str()) {
                    Some(preset) => {
                        let days = preset.days.iter().map(|s| s.to_string()).collect();
                        (days, rest_pattern.or(Some(preset.rest_pattern)), preset.name)
                    }
                    None => {
                        println!(
                            "{} unknown split `{}` (expected one of: {}, custom)",
                            "error:".red().bold(),
                            split_type,
                            PRESET_SPLITS.keys().copied().collect::<Vec<_>>().join(", ")
                        );
                        return Ok(());
                    }
                }
            };

            if let Some(rest) = rest_pattern {
                if rest == 0 {
                    println!("{} rest pattern must be ≥ 1", "error:".red().bold());
                    return Ok(());
                }
            }

            if let Some(index) = start_index {
                if index >= days.len() {
                    println!(
                        "{} start index {} is out of range for {} days",
                        "error:".red().bold(),
                        index,
                        days.len()
                    );
                    return Ok(());
                }
            }

            let start_date = match start_date {
                Some(s) => match parse_date(&s) {
                    Ok(d) => d,
                    Err(e) => {
                        println!("{} {}", "error:".red().bold(), e);
                        return Ok(());
                    }
                },
                None => Local::now().date_naive(),
            };

            ensure_profile_row(pool).await?;

            sqlx::query(
                r#"
                UPDATE profiles SET
                    split_type = ?,
                    split_days = ?,
                    split_rest_pattern = ?,
                    split_current_day_index = ?,
                    split_start_date = ?
                WHERE id = 1
                "#,
            )
            .bind(&split_type)
            .bind(serde_json::to_string(&days)?)
            .bind(rest_pattern.map(|r| r as i64))
            .bind(start_index.map(|i| i as i64))
            .bind(start_date.format(commands::DATE_FMT).to_string())
            .execute(pool)
            .await?;

            println!(
                "{} split set to {} ({}), anchored to {}",
                "ok:".green().bold(),
                display_name.bold(),
                days.join("/"),
                start_date
            );
            Ok(())
        }

        SplitCmd::Clear => {
            ensure_profile_row(pool).await?;

            sqlx::query(
                r#"
                UPDATE profiles SET
                    split_type = NULL,
                    split_days = NULL,
                    split_rest_pattern = NULL,
                    split_current_day_index = NULL,
                    split_start_date = NULL
                WHERE id = 1
                "#,
            )
            .execute(pool)
            .await?;

            println!(
                "{} split cleared — back on the legacy weekly schedule",
                "ok:".green().bold()
            );
            Ok(())
        }
    }
}
