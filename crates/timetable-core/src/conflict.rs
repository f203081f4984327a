//! Scheduling conflict detection.
//!
//! A candidate entry conflicts with an existing one when both fall on the
//! same weekday, their `[start, end)` intervals overlap, and they share a
//! lecturer or a classroom. Touching intervals (one ends exactly when the
//! other starts) do not overlap.

use chrono::{NaiveTime, Weekday};
use serde::Serialize;

use crate::models::{day_number, TimetableEntry};

/// What two colliding entries have in common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictReason {
    Lecturer,
    Classroom,
    Both,
}

impl ConflictReason {
    fn between(candidate: &TimetableEntry, existing: &TimetableEntry) -> Option<Self> {
        let lecturer = same_reference(&candidate.lecturer_id, &existing.lecturer_id);
        let classroom = same_reference(&candidate.classroom_id, &existing.classroom_id);
        match (lecturer, classroom) {
            (true, true) => Some(Self::Both),
            (true, false) => Some(Self::Lecturer),
            (false, true) => Some(Self::Classroom),
            (false, false) => None,
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            Self::Lecturer => "lecturer is already teaching",
            Self::Classroom => "classroom is already booked",
            Self::Both => "lecturer and classroom are already booked",
        }
    }
}

/// An existing entry the candidate collides with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub entry_id: String,
    pub reason: ConflictReason,
    pub course_code: String,
    pub lecturer_name: String,
    pub classroom_name: String,
    #[serde(with = "day_number")]
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Conflict {
    fn new(existing: &TimetableEntry, reason: ConflictReason, range: (NaiveTime, NaiveTime)) -> Self {
        Self {
            entry_id: existing.id.clone(),
            reason,
            course_code: existing.course_code.clone(),
            lecturer_name: existing.lecturer_name.clone(),
            classroom_name: existing.classroom_name.clone(),
            day_of_week: existing.day_of_week,
            start_time: range.0,
            end_time: range.1,
        }
    }

    /// One-line description for display.
    pub fn summary(&self) -> String {
        format!(
            "{} ({} {}-{}): {}",
            self.course_code,
            self.day_of_week,
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M"),
            self.reason.describe()
        )
    }
}

// Empty ids come from unfinished forms and never match anything.
fn same_reference(a: &str, b: &str) -> bool {
    !a.is_empty() && a == b
}

/// Whether two half-open `[start, end)` intervals share any instant.
pub fn intervals_overlap(a: (NaiveTime, NaiveTime), b: (NaiveTime, NaiveTime)) -> bool {
    !(a.1 <= b.0 || a.0 >= b.1)
}

fn collision(
    candidate: &TimetableEntry,
    candidate_range: (NaiveTime, NaiveTime),
    existing: &TimetableEntry,
) -> Option<Conflict> {
    if existing.id == candidate.id || existing.day_of_week != candidate.day_of_week {
        return None;
    }
    let existing_range = existing.time_range()?;
    if !intervals_overlap(candidate_range, existing_range) {
        return None;
    }
    ConflictReason::between(candidate, existing)
        .map(|reason| Conflict::new(existing, reason, existing_range))
}

/// Every existing entry the candidate collides with, in input order.
///
/// The candidate is skipped over in `existing` by id, so an entry being
/// edited never conflicts with its stored version. Entries without both a
/// start and an end time are not compared.
pub fn find_conflicts(candidate: &TimetableEntry, existing: &[TimetableEntry]) -> Vec<Conflict> {
    let Some(range) = candidate.time_range() else {
        return Vec::new();
    };
    existing
        .iter()
        .filter_map(|entry| collision(candidate, range, entry))
        .collect()
}

/// Whether the candidate collides with any existing entry.
pub fn has_conflict(candidate: &TimetableEntry, existing: &[TimetableEntry]) -> bool {
    candidate.time_range().is_some_and(|range| {
        existing
            .iter()
            .any(|entry| collision(candidate, range, entry).is_some())
    })
}
