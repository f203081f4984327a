use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] timetable_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("Proposed slot conflicts with {0} existing entries")]
    ConflictsFound(usize),
}

impl From<timetable_core::ValidationError> for CliError {
    fn from(error: timetable_core::ValidationError) -> Self {
        Self::Core(error.into())
    }
}
