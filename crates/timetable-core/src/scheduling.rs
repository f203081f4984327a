//! Admin workflow for placing classes on the timetable.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conflict::{find_conflicts, Conflict};
use crate::error::{Error, Result, ValidationError};
use crate::models::{
    weekday_from_number, ClassType, Classroom, Course, Department, Lecturer, Level, Record,
    Semester, TimetableEntry,
};
use crate::remote::RemoteStore;
use crate::sync::SyncController;
use crate::util::{normalize_text_option, unix_timestamp_ms_now};

/// Role granted by the authentication collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Lecturer,
    Student,
}

/// The signed-in user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    fn require_admin(&self, action: &str) -> Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(Error::PermissionDenied(format!(
                "only administrators can {action}"
            )))
        }
    }
}

/// Form state of the schedule-class screen. Every field may still be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// Set when editing an existing entry
    #[serde(default)]
    pub entry_id: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub lecturer_id: Option<String>,
    #[serde(default)]
    pub classroom_id: Option<String>,
    /// 1 = Monday .. 7 = Sunday
    #[serde(default)]
    pub day_of_week: Option<u8>,
    #[serde(default)]
    pub class_type: Option<ClassType>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
}

/// A request with every required field present and consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub entry_id: Option<String>,
    pub department_id: String,
    pub level: Level,
    pub course_id: String,
    pub lecturer_id: String,
    pub classroom_id: String,
    pub day_of_week: Weekday,
    pub class_type: ClassType,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

fn required_text(value: Option<&str>, field: &'static str) -> Result<String, ValidationError> {
    normalize_text_option(value).ok_or(ValidationError::MissingField(field))
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}

fn day(number: u8) -> Result<Weekday, ValidationError> {
    weekday_from_number(number).ok_or(ValidationError::InvalidDay(number))
}

impl ScheduleRequest {
    /// Check required fields in form order, then the time range.
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        let department_id = required_text(self.department_id.as_deref(), "department")?;
        let level = required(self.level, "level")?;
        let course_id = required_text(self.course_id.as_deref(), "course")?;
        let lecturer_id = required_text(self.lecturer_id.as_deref(), "lecturer")?;
        let classroom_id = required_text(self.classroom_id.as_deref(), "classroom")?;
        let day_number = required(self.day_of_week, "day of week")?;
        let class_type = required(self.class_type, "class type")?;
        let start_time = required(self.start_time, "start time")?;
        let end_time = required(self.end_time, "end time")?;

        let day_of_week = day(day_number)?;
        if end_time <= start_time {
            return Err(ValidationError::EndBeforeStart);
        }

        Ok(ValidatedRequest {
            entry_id: normalize_text_option(self.entry_id.as_deref()),
            department_id,
            level,
            course_id,
            lecturer_id,
            classroom_id,
            day_of_week,
            class_type,
            start_time,
            end_time,
        })
    }

    /// Minimal entry for the interactive check, or `None` while the slot
    /// (day, times, lecturer, classroom) is incomplete.
    fn provisional_entry(&self) -> Option<TimetableEntry> {
        let day_of_week = weekday_from_number(self.day_of_week?)?;
        let lecturer_id = normalize_text_option(self.lecturer_id.as_deref())?;
        let classroom_id = normalize_text_option(self.classroom_id.as_deref())?;

        Some(TimetableEntry {
            id: self.entry_id.clone().unwrap_or_default(),
            course_id: String::new(),
            course_name: String::new(),
            course_code: String::new(),
            lecturer_id,
            lecturer_name: String::new(),
            classroom_id,
            classroom_name: String::new(),
            department_id: String::new(),
            department_name: String::new(),
            level: self.level.unwrap_or(Level::L100),
            semester: Semester::First,
            day_of_week,
            start_time: Some(self.start_time?),
            end_time: Some(self.end_time?),
            class_type: self.class_type.unwrap_or(ClassType::Lecture),
            last_modified: 0,
            last_modified_by: None,
        })
    }
}

/// Conflicts for a partially filled form, re-run on every field change.
pub fn preview_conflicts(request: &ScheduleRequest, snapshot: &[TimetableEntry]) -> Vec<Conflict> {
    request
        .provisional_entry()
        .map(|candidate| find_conflicts(&candidate, snapshot))
        .unwrap_or_default()
}

/// Validates, conflict-checks and commits timetable entries.
pub struct Scheduler<'a, R: RemoteStore> {
    sync: &'a SyncController,
    remote: &'a R,
}

impl<'a, R: RemoteStore> Scheduler<'a, R> {
    pub const fn new(sync: &'a SyncController, remote: &'a R) -> Self {
        Self { sync, remote }
    }

    /// Interactive conflict check against the local mirror.
    pub async fn preview(&self, request: &ScheduleRequest) -> Result<Vec<Conflict>> {
        let snapshot = self.sync.mirror().get_all::<TimetableEntry>().await?;
        Ok(preview_conflicts(request, &snapshot))
    }

    /// Create or replace a timetable entry.
    ///
    /// Conflicts are checked against a fresh snapshot of the timetable
    /// (the mirror when the remote is unreachable) right before the write.
    pub async fn schedule(&self, request: &ScheduleRequest, actor: &Actor) -> Result<TimetableEntry> {
        actor.require_admin("schedule classes")?;
        let valid = request.validate()?;
        let entry = self.build_entry(valid, actor).await?;

        let snapshot = self.sync.sync_all::<TimetableEntry, R>(self.remote).await?;
        if snapshot.from_cache {
            tracing::warn!("Checking conflicts for {} against the local mirror", entry.id);
        }

        let conflicts = find_conflicts(&entry, &snapshot.records);
        if !conflicts.is_empty() {
            tracing::info!(
                "Rejected {} on {}: {} conflicts",
                entry.label(),
                entry.day_of_week,
                conflicts.len()
            );
            return Err(Error::SchedulingConflict(conflicts));
        }

        self.sync.save(self.remote, &entry).await?;
        tracing::info!("Scheduled {} as {}", entry.label(), entry.id);
        Ok(entry)
    }

    /// Remove a timetable entry.
    pub async fn unschedule(&self, id: &str, actor: &Actor) -> Result<()> {
        actor.require_admin("remove classes")?;
        self.sync.remove::<TimetableEntry, R>(self.remote, id).await?;
        tracing::info!("Unscheduled {id}");
        Ok(())
    }

    async fn build_entry(&self, valid: ValidatedRequest, actor: &Actor) -> Result<TimetableEntry> {
        let mirror = self.sync.mirror();
        let course: Course = resolve(mirror.get_by_id(&valid.course_id).await?, &valid.course_id)?;
        let lecturer: Lecturer =
            resolve(mirror.get_by_id(&valid.lecturer_id).await?, &valid.lecturer_id)?;
        let classroom: Classroom =
            resolve(mirror.get_by_id(&valid.classroom_id).await?, &valid.classroom_id)?;
        let department: Department =
            resolve(mirror.get_by_id(&valid.department_id).await?, &valid.department_id)?;

        Ok(TimetableEntry {
            id: valid
                .entry_id
                .unwrap_or_else(|| Uuid::now_v7().to_string()),
            course_name: course.name.clone(),
            course_code: course.code.clone(),
            course_id: course.id,
            lecturer_name: lecturer.full_name(),
            lecturer_id: lecturer.id,
            classroom_name: classroom.full_name(),
            classroom_id: classroom.id,
            department_id: department.id,
            department_name: department.name,
            level: valid.level,
            semester: course.semester,
            day_of_week: valid.day_of_week,
            start_time: Some(valid.start_time),
            end_time: Some(valid.end_time),
            class_type: valid.class_type,
            last_modified: unix_timestamp_ms_now(),
            last_modified_by: Some(actor.user_id.clone()),
        })
    }
}

fn resolve<T: Record>(record: Option<T>, id: &str) -> Result<T> {
    record.ok_or_else(|| {
        ValidationError::UnknownReference {
            collection: T::COLLECTION,
            id: id.to_string(),
        }
        .into()
    })
}
