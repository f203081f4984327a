use std::path::Path;

use timetable_core::models::weekday_from_number;
use timetable_core::{preview_conflicts, ScheduleRequest, TimetableEntry, ValidationError};

use crate::commands::common::{open_mirror, parse_clock_time};
use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotArgs {
    pub day: u8,
    pub start: String,
    pub end: String,
    pub lecturer: String,
    pub classroom: String,
    pub exclude: Option<String>,
}

impl SlotArgs {
    /// Turn the flags into the partial form the conflict preview expects.
    pub fn to_request(&self) -> Result<ScheduleRequest, CliError> {
        if weekday_from_number(self.day).is_none() {
            return Err(ValidationError::InvalidDay(self.day).into());
        }

        let start_time = parse_clock_time(&self.start)?;
        let end_time = parse_clock_time(&self.end)?;
        if end_time <= start_time {
            return Err(ValidationError::EndBeforeStart.into());
        }

        Ok(ScheduleRequest {
            entry_id: self.exclude.clone(),
            lecturer_id: Some(self.lecturer.clone()),
            classroom_id: Some(self.classroom.clone()),
            day_of_week: Some(self.day),
            start_time: Some(start_time),
            end_time: Some(end_time),
            ..ScheduleRequest::default()
        })
    }
}

pub async fn run_check(slot: &SlotArgs, db_path: &Path) -> Result<(), CliError> {
    let request = slot.to_request()?;
    let mirror = open_mirror(db_path).await?;
    let snapshot = mirror.get_all::<TimetableEntry>().await?;

    let conflicts = preview_conflicts(&request, &snapshot);
    if conflicts.is_empty() {
        println!("No conflicts among {} mirrored entries.", snapshot.len());
        return Ok(());
    }

    for conflict in &conflicts {
        println!("{}", conflict.summary());
    }
    Err(CliError::ConflictsFound(conflicts.len()))
}
