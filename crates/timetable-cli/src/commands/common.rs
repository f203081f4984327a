use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveTime;
use serde::Serialize;
use timetable_core::{
    Classroom, Course, Department, Lecturer, MirrorService, SyncConfig, TimetableEntry,
};

use crate::error::CliError;

const DB_PATH_ENV: &str = "TIMETABLE_DB_PATH";
const REMOTE_TIMEOUT_ENV: &str = "TIMETABLE_REMOTE_TIMEOUT_SECS";

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os(DB_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("timetable")
        .join("timetable.db")
}

pub async fn open_mirror(db_path: &Path) -> Result<MirrorService, CliError> {
    Ok(MirrorService::open_path(db_path).await?)
}

/// Remote timeout from the flag, then the environment, then the default.
pub fn sync_config(timeout_secs: Option<u64>) -> Result<SyncConfig, CliError> {
    let timeout_secs = match timeout_secs {
        Some(secs) => Some(secs),
        None => env::var(REMOTE_TIMEOUT_ENV)
            .ok()
            .map(|value| parse_timeout_secs(&value))
            .transpose()?,
    };

    Ok(timeout_secs.map_or_else(SyncConfig::default, |secs| {
        SyncConfig::default().with_remote_timeout(Duration::from_secs(secs))
    }))
}

pub fn parse_timeout_secs(value: &str) -> Result<u64, CliError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or_else(|| CliError::InvalidEnv {
            name: REMOTE_TIMEOUT_ENV,
            value: value.to_string(),
        })
}

/// Parse `HH:MM` (or `HH:MM:SS`) wall-clock time.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, CliError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| CliError::InvalidTime(value.to_string()))
}

/// One-line human rendering of a mirrored record.
pub trait RecordLine {
    fn line(&self) -> String;
}

impl RecordLine for Department {
    fn line(&self) -> String {
        format!("{}  {:<8} {}", self.id, self.code, self.name)
    }
}

impl RecordLine for Course {
    fn line(&self) -> String {
        format!(
            "{}  {:<10} {} (level {}, semester {}, {} credits)",
            self.id, self.code, self.name, self.level, self.semester, self.credit_hours
        )
    }
}

impl RecordLine for Lecturer {
    fn line(&self) -> String {
        format!(
            "{}  {} - {}",
            self.id,
            self.full_name(),
            self.department_name
        )
    }
}

impl RecordLine for Classroom {
    fn line(&self) -> String {
        format!(
            "{}  {} ({}, {} seats)",
            self.id,
            self.full_name(),
            self.room_type,
            self.capacity
        )
    }
}

impl RecordLine for TimetableEntry {
    fn line(&self) -> String {
        format!(
            "{} {}  {}  {}  {}  [{}]",
            self.day_of_week,
            format_time_range(self.start_time, self.end_time),
            self.label(),
            self.lecturer_name,
            self.classroom_name,
            self.id
        )
    }
}

pub fn format_time_range(start: Option<NaiveTime>, end: Option<NaiveTime>) -> String {
    let format = |time: Option<NaiveTime>| {
        time.map_or_else(|| "--:--".to_string(), |time| time.format("%H:%M").to_string())
    };
    format!("{}-{}", format(start), format(end))
}

pub fn print_records<T: Serialize + RecordLine>(
    records: &[T],
    as_json: bool,
    empty_message: &str,
) -> Result<(), CliError> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{empty_message}");
        return Ok(());
    }

    for record in records {
        println!("{}", record.line());
    }
    Ok(())
}
