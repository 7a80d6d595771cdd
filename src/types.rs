use std::{collections::BTreeMap, fmt::Display, path::Path};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

/// The legacy fixed day types, for accounts without a configured split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayType {
    ChestTriceps,
    BackAbs,
    BicepsShoulders,
    LegsRearDeltForearms,
    Rest,
}

impl Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ChestTriceps => "Chest & Triceps",
            Self::BackAbs => "Back & Abs",
            Self::BicepsShoulders => "Biceps & Shoulders",
            Self::LegsRearDeltForearms => "Legs, Rear Delt & Forearms",
            Self::Rest => "Rest Day",
        };

        write!(f, "{}", s)
    }
}

impl DayType {
    /// Parse a day-type label back into the enum, if it is one of ours.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Chest & Triceps" => Some(Self::ChestTriceps),
            "Back & Abs" => Some(Self::BackAbs),
            "Biceps & Shoulders" => Some(Self::BicepsShoulders),
            "Legs, Rear Delt & Forearms" => Some(Self::LegsRearDeltForearms),
            "Rest Day" => Some(Self::Rest),
            _ => None,
        }
    }
}

/// The legacy weekday → day-type table. Preserved bit-for-bit from the
/// pre-rotation schedule: Saturday and Sunday are always rest.
pub fn weekday_day_type(date: NaiveDate) -> DayType {
    match date.weekday() {
        Weekday::Mon | Weekday::Thu => DayType::ChestTriceps,
        Weekday::Tue => DayType::BackAbs,
        Weekday::Wed => DayType::BicepsShoulders,
        Weekday::Fri => DayType::LegsRearDeltForearms,
        Weekday::Sat | Weekday::Sun => DayType::Rest,
    }
}

/// A named preset rotation the user can pick instead of a custom one.
pub struct PresetSplit {
    pub name: &'static str,
    pub days: &'static [&'static str],
    pub rest_pattern: u32,
}

pub static PRESET_SPLITS: Lazy<BTreeMap<&'static str, PresetSplit>> = Lazy::new(|| {
    BTreeMap::from([
        (
            "ppl",
            PresetSplit {
                name: "Push/Pull/Legs",
                days: &["Push", "Pull", "Legs"],
                rest_pattern: 6, // PPL PPL Rest
            },
        ),
        (
            "bro",
            PresetSplit {
                name: "Bro Split",
                days: &["Chest", "Back", "Shoulders", "Arms", "Legs"],
                rest_pattern: 5,
            },
        ),
        (
            "upper-lower",
            PresetSplit {
                name: "Upper/Lower",
                days: &["Upper", "Lower"],
                rest_pattern: 4, // Upper Lower Upper Lower Rest
            },
        ),
        (
            "full-body",
            PresetSplit {
                name: "Full Body",
                days: &["Full Body"],
                rest_pattern: 2, // Full Body, Rest, Full Body, Rest
            },
        ),
    ])
});

/// Default exercise lists for the legacy day types, used to pre-populate
/// a session when the user has no prior workout of that type.
pub fn default_exercises(day: DayType) -> &'static [&'static str] {
    match day {
        DayType::ChestTriceps => &[
            "Chest Press",
            "Incline Press",
            "Dips",
            "Cable Tricep Pushdowns",
            "Rope Extensions",
        ],
        DayType::BackAbs => &[
            "Back: Deadlifts",
            "Back: Lat Pulldowns",
            "Back: High Row",
            "Abs: Machine Crunches",
            "Abs: Hanging Leg Raises",
        ],
        DayType::BicepsShoulders => &[
            "EZ Bar Curls",
            "Hammer Curls",
            "Preacher Machine Curls",
            "Shoulders: Shoulder Press",
            "Shoulders: Lateral Raise",
        ],
        DayType::LegsRearDeltForearms => &[
            "Leg Press",
            "Leg Extensions",
            "Lying Leg Curls",
            "Rear Delt Fly",
            "Wrist Curls",
        ],
        DayType::Rest => &[],
    }
}

/// Return the closest previously-logged exercise name for `input`
/// if similarity ≥ 0.80 *and* clearly better than the runner-up.
/// Otherwise return `None` (no suggestion shown).
pub fn best_exercise_suggestion<'a>(input: &str, known: &'a [String]) -> Option<&'a str> {
    if known.is_empty() {
        return None;
    }

    let inp = input.trim().to_lowercase();
    if inp.is_empty() {
        return None;
    }

    // Collect (name, score) pairs.
    let mut scores: Vec<(&'a str, f64)> = known
        .iter()
        .map(|n| (n.as_str(), jaro_winkler(&inp, &n.trim().to_lowercase())))
        .collect();

    // Highest score first.
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    let (best_name, best_score) = scores[0];
    let second_score = scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

    const MIN_SCORE: f64 = 0.80;
    const GAP: f64 = 0.02;

    if best_score >= MIN_SCORE && best_score - second_score >= GAP {
        Some(best_name)
    } else {
        None
    }
}

/// Flat key/value config stored as TOML in the platform config dir.
/// Holds nutrition goals and display tweaks.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub map: BTreeMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Numeric goal lookup with a default when unset or unparsable.
    pub fn goal(&self, key: &str, default: f32) -> f32 {
        self.map
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

pub fn config_path() -> Result<std::path::PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("ironlog").join("config.toml"))
        .context("Could not determine config directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_table_weekend_is_rest() {
        // 2025-01-04 is a Saturday, 2025-01-05 a Sunday.
        let sat = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
        let sun = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(weekday_day_type(sat), DayType::Rest);
        assert_eq!(weekday_day_type(sun), DayType::Rest);
    }

    #[test]
    fn weekday_table_monday_and_thursday_match() {
        let mon = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let thu = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(weekday_day_type(mon), DayType::ChestTriceps);
        assert_eq!(weekday_day_type(thu), DayType::ChestTriceps);
        assert_eq!(weekday_day_type(mon), weekday_day_type(thu));
    }

    #[test]
    fn suggestion_matches_close_name() {
        let known = vec!["Bench Press".to_string(), "Leg Press".to_string()];
        assert_eq!(best_exercise_suggestion("bench pres", &known), Some("Bench Press"));
    }

    #[test]
    fn suggestion_none_for_garbage() {
        let known = vec!["Bench Press".to_string(), "Leg Press".to_string()];
        assert_eq!(best_exercise_suggestion("zzzzzz", &known), None);
    }
}
