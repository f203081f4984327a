use std::path::PathBuf;

use clap::{Parser, Subcommand};
use timetable_core::models::Level;
use timetable_core::Collection;

#[derive(Parser)]
#[command(name = "timetable")]
#[command(about = "Inspect and refresh the offline timetable mirror")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local mirror file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List mirrored records of a collection
    List {
        /// departments, courses, lecturers, classrooms or timetable
        collection: Collection,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show timetable entries, optionally filtered
    Timetable {
        /// Only entries taught by this lecturer id
        #[arg(long)]
        lecturer: Option<String>,
        /// Only entries held in this classroom id
        #[arg(long)]
        classroom: Option<String>,
        /// Only entries of this department id
        #[arg(long)]
        department: Option<String>,
        /// Only entries of this level (100, 200, 300, 400)
        #[arg(long)]
        level: Option<Level>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show last sync time and record count per collection
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a proposed slot against the mirrored timetable
    Check {
        /// Day of week, 1 (Monday) to 7 (Sunday)
        #[arg(long)]
        day: u8,
        /// Start time, HH:MM
        #[arg(long)]
        start: String,
        /// End time, HH:MM
        #[arg(long)]
        end: String,
        /// Lecturer id
        #[arg(long)]
        lecturer: String,
        /// Classroom id
        #[arg(long)]
        classroom: String,
        /// Entry id being edited, ignored when comparing
        #[arg(long, value_name = "ID")]
        exclude: Option<String>,
    },
    /// Refresh every collection from a directory of JSON exports
    Sync {
        /// Directory holding `<collection>.json` files
        #[arg(long, value_name = "DIR")]
        from: PathBuf,
        /// Remote timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
    /// Empty the mirror and its sync ledger
    Clear,
}
