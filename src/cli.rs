use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ironlog", version, about = "CLI workout and nutrition tracker")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Session-scoped commands
    #[command(subcommand, visible_alias = "s")]
    Session(SessionCmd),

    /// Exercise history and smart targets
    #[command(subcommand, visible_alias = "ex")]
    Exercise(ExerciseCmd),

    /// View or edit your profile and workout split
    #[command(subcommand, visible_alias = "p")]
    Profile(ProfileCmd),

    /// Log food
    #[command(subcommand, visible_alias = "f")]
    Food(FoodCmd),

    /// Log water intake in ml
    Water {
        /// Amount in ml
        amount: f32,
    },

    /// Daily nutrition summary
    #[command(visible_alias = "n")]
    Nutrition {
        /// Date in YYYY-MM-DD format (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show today's workout and smart targets
    Status,

    /// Show the split schedule and logged sessions in a calendar view
    #[command(visible_alias = "cal")]
    Calendar {
        /// Year to show (defaults to current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month to show (1-12, defaults to current month)
        #[arg(short, long)]
        month: Option<u32>,
    },

    /// View or edit ironlog config
    #[command(subcommand)]
    Config(ConfigCmd),

    /// Db operations
    #[command(subcommand)]
    Db(DbCmd),
}

//
// Commands
//

#[derive(Subcommand)]
pub enum SessionCmd {
    /// Start a session for today's workout
    #[command(visible_alias = "s")]
    Start(StartArgs),

    /// Cancel the current session
    #[command(visible_alias = "c")]
    Cancel,

    /// Show current session details
    #[command(visible_alias = "i")]
    Show,

    /// End the current session
    End,

    /// Log a set in the current session - Usage: session edit EXERCISE WEIGHT REPS
    #[command(visible_alias = "e")]
    #[command(override_usage = "session edit <EXERCISE> <WEIGHT> <REPS>")]
    Edit {
        /// Exercise index (1-based, same order shown in `session show`)
        #[arg(value_name = "EXERCISE")]
        exercise: usize,

        /// Weight in kg
        #[arg(value_name = "WEIGHT")]
        weight: f32,

        /// Number of reps
        #[arg(value_name = "REPS")]
        reps: u32,
    },

    /// Add an exercise to the current session
    AddEx {
        /// Exercise name (may carry a "MuscleGroup:" prefix)
        exercise: String,
    },

    /// Show details of a completed session from a specific date
    Log {
        /// Date in YYYY-MM-DD format
        #[arg(short, long)]
        date: String,
    },
}

#[derive(Args)]
pub struct StartArgs {
    /// Override the resolved workout type for today
    #[arg(short, long)]
    pub workout_type: Option<String>,
}

#[derive(Subcommand)]
pub enum ExerciseCmd {
    /// Show the smart target for an exercise
    #[command(visible_alias = "t")]
    Target {
        /// Exercise name
        name: String,

        /// Workout type to search within (defaults to today's resolved type)
        #[arg(short = 't', long)]
        workout_type: Option<String>,
    },

    /// Show the recent history timeline for an exercise
    #[command(visible_alias = "h")]
    History {
        /// Exercise name
        name: String,

        /// Workout type to search within (defaults to today's resolved type)
        #[arg(short = 't', long)]
        workout_type: Option<String>,

        /// Show an ASCII volume graph
        #[arg(short, long)]
        graph: bool,
    },
}

#[derive(Subcommand)]
pub enum ProfileCmd {
    /// Show the profile and split configuration
    Show,

    /// Set body metrics
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        age: Option<u32>,

        /// Body weight in kg
        #[arg(long)]
        weight: Option<f32>,

        /// Height in cm
        #[arg(long)]
        height: Option<f32>,

        #[arg(long)]
        gender: Option<String>,

        /// sedentary | light | moderate | active | very-active
        #[arg(long)]
        activity: Option<String>,
    },

    /// Configure the workout split rotation
    #[command(subcommand)]
    Split(SplitCmd),
}

#[derive(Subcommand)]
pub enum SplitCmd {
    /// Set the rotation (preset: ppl, bro, upper-lower, full-body; or custom)
    Set {
        /// Preset key or "custom"
        split_type: String,

        /// Day labels for a custom split (comma separated)
        #[arg(long, value_delimiter = ',')]
        days: Option<Vec<String>>,

        /// Workout days before a rest day (defaults per preset, or to the day count)
        #[arg(long)]
        rest_pattern: Option<u32>,

        /// Rotation slot occupied on the start date (0-based, defaults to 0)
        #[arg(long)]
        start_index: Option<usize>,

        /// Anchor date in YYYY-MM-DD format (defaults to today)
        #[arg(long)]
        start_date: Option<String>,
    },

    /// Remove the rotation and fall back to the fixed weekly schedule
    Clear,
}

#[derive(Subcommand)]
pub enum FoodCmd {
    /// Log a food item
    #[command(visible_alias = "a")]
    Add {
        /// Food name
        name: String,

        /// Calories (kcal)
        #[arg(long)]
        calories: f32,

        /// Protein in grams
        #[arg(long, default_value = "0")]
        protein: f32,

        /// Carbs in grams
        #[arg(long, default_value = "0")]
        carbs: f32,

        /// Fat in grams
        #[arg(long, default_value = "0")]
        fat: f32,

        /// Amount eaten
        #[arg(long, default_value = "0")]
        amount: f32,

        /// g for solids, ml for liquids
        #[arg(long, default_value = "g")]
        unit: String,
    },

    /// List logged food
    #[command(visible_alias = "l")]
    List {
        /// Date in YYYY-MM-DD format (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Show all config keys
    List,

    /// Get the value of a key
    Get { key: String },

    /// Set or override a key
    Set { key: String, val: String },

    /// Remove a key
    Unset { key: String },
}

#[derive(Subcommand)]
pub enum DbCmd {
    /// Export the database to a TOML file
    Export {
        /// Output file path (defaults to dump.toml)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Import sessions and logs from a TOML dump
    Import {
        /// Input TOML file path
        file: String,
    },
}
