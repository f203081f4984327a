use std::path::Path;

use timetable_core::models::{Field, FieldFilter, Level};
use timetable_core::TimetableEntry;

use crate::commands::common::{open_mirror, print_records};
use crate::error::CliError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TimetableFilter {
    pub lecturer: Option<String>,
    pub classroom: Option<String>,
    pub department: Option<String>,
    pub level: Option<Level>,
}

impl TimetableFilter {
    pub fn to_field_filters(&self) -> Vec<FieldFilter> {
        let mut filters = Vec::new();
        if let Some(lecturer) = &self.lecturer {
            filters.push(FieldFilter::new(Field::LecturerId, lecturer.trim()));
        }
        if let Some(classroom) = &self.classroom {
            filters.push(FieldFilter::new(Field::ClassroomId, classroom.trim()));
        }
        if let Some(department) = &self.department {
            filters.push(FieldFilter::new(Field::DepartmentId, department.trim()));
        }
        if let Some(level) = self.level {
            filters.push(FieldFilter::new(Field::Level, level.as_str()));
        }
        filters
    }
}

pub async fn run_timetable(
    filter: &TimetableFilter,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let mirror = open_mirror(db_path).await?;
    let entries = mirror
        .query_by_fields::<TimetableEntry>(&filter.to_field_filters())
        .await?;
    print_records(&entries, as_json, "No matching timetable entries.")
}
