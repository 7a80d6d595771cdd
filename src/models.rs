use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// One performed repetition group. Immutable once the owning session is
/// finished, mutable while it is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetEntry {
    pub weight: f32,
    pub reps: u32,
    pub timestamp: DateTime<Local>,
}

impl SetEntry {
    /// Volume of a single set (weight × reps).
    pub fn volume(&self) -> f32 {
        self.weight * self.reps as f32
    }
}

/// A named movement performed within a session. History lookups join on
/// the trimmed, lower-cased name, so two differently-cased spellings are
/// the same exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muscle_group: Option<String>,
    pub sets: Vec<SetEntry>,
}

impl ExerciseEntry {
    pub fn total_volume(&self) -> f32 {
        self.sets.iter().map(SetEntry::volume).sum()
    }
}

/// One workout. In progress while `end_time` is `None`; `duration_secs`
/// is stamped at completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<i64>,
    pub workout_type: String,
    pub exercises: Vec<ExerciseEntry>,
}

/// A configured workout rotation, anchored to an absolute start date so
/// the schedule stays reproducible no matter how long the app goes
/// unopened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    pub split_type: String,
    pub days: Vec<String>,
    /// Consecutive workout days before a mandatory rest day. `None`
    /// defaults to `days.len()`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_pattern: Option<u32>,
    /// Rotation slot occupied on `start_date`. `None` defaults to 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_day_index: Option<usize>,
    pub start_date: NaiveDate,
}

/// Per-user record. `split = None` means the account predates the
/// rotation feature and is on the legacy fixed weekly schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitConfig>,
}

/// One logged food item. `source` is "manual" for CLI entries; the
/// barcode/ai values exist for imported dumps from other clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLog {
    pub id: String,
    pub date: NaiveDate,
    pub timestamp: DateTime<Local>,
    pub name: String,
    pub calories: f32,
    pub protein: f32,
    pub carbs: f32,
    pub fat: f32,
    pub amount: f32,
    pub unit: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterLog {
    pub id: String,
    pub date: NaiveDate,
    pub timestamp: DateTime<Local>,
    pub amount_ml: f32,
}
