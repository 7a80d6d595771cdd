use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use db::open;

mod cli;
mod commands;
mod db;
mod models;
mod progression;
mod schedule;
mod types;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let db_path = std::env::var("IRONLOG_DB").unwrap_or_else(|_| "./ironlog.db".to_string());

    let pool = open(&db_path).await?;

    match cli.cmd {
        Commands::Session(cmd) => commands::session::handle(cmd, &pool).await?,
        Commands::Exercise(cmd) => commands::exercise::handle(cmd, &pool).await?,
        Commands::Profile(cmd) => commands::profile::handle(cmd, &pool).await?,
        Commands::Food(cmd) => commands::nutrition::handle_food(cmd, &pool).await?,
        Commands::Water { amount } => commands::nutrition::handle_water(amount, &pool).await?,
        Commands::Nutrition { date } => commands::nutrition::handle_day(date, &pool).await?,
        Commands::Status => commands::status::handle(&pool).await?,
        Commands::Calendar { year, month } => commands::calendar::handle(&pool, year, month).await?,
        Commands::Config(cmd) => commands::config::handle(cmd).await?,
        Commands::Db(cmd) => commands::db::handle(cmd, &pool).await?,
    }

    Ok(())
}
