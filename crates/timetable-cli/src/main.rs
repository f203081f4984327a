//! Timetable CLI - inspect and refresh the offline timetable mirror
//!
//! Works entirely against the local mirror file; `sync` refreshes it from a
//! directory of JSON collection exports.

mod cli;
mod commands;
mod error;
mod json_remote;

#[cfg(test)]
mod tests;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::check::{run_check, SlotArgs};
use crate::commands::clear::run_clear;
use crate::commands::common::resolve_db_path;
use crate::commands::list::run_list;
use crate::commands::status::run_status;
use crate::commands::sync::run_sync;
use crate::commands::timetable::{run_timetable, TimetableFilter};
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "timetable=info,timetable_core=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);

    match cli.command {
        Commands::List { collection, json } => run_list(collection, json, &db_path).await?,
        Commands::Timetable {
            lecturer,
            classroom,
            department,
            level,
            json,
        } => {
            let filter = TimetableFilter {
                lecturer,
                classroom,
                department,
                level,
            };
            run_timetable(&filter, json, &db_path).await?;
        }
        Commands::Status { json } => run_status(json, &db_path).await?,
        Commands::Check {
            day,
            start,
            end,
            lecturer,
            classroom,
            exclude,
        } => {
            let slot = SlotArgs {
                day,
                start,
                end,
                lecturer,
                classroom,
                exclude,
            };
            run_check(&slot, &db_path).await?;
        }
        Commands::Sync { from, timeout } => run_sync(&from, timeout, &db_path).await?,
        Commands::Clear => run_clear(&db_path).await?,
    }

    Ok(())
}
