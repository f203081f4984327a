//! Timetable entry model

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Collection, Field, Record};
use crate::error::ValidationError;

/// Academic year band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "100")]
    L100,
    #[serde(rename = "200")]
    L200,
    #[serde(rename = "300")]
    L300,
    #[serde(rename = "400")]
    L400,
}

impl Level {
    pub const ALL: [Self; 4] = [Self::L100, Self::L200, Self::L300, Self::L400];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::L100 => "100",
            Self::L200 => "200",
            Self::L300 => "300",
            Self::L400 => "400",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s.trim())
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "level",
                value: s.to_string(),
            })
    }
}

/// Semester within an academic year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Semester {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
}

impl Semester {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "1",
            Self::Second => "2",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Semester {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::First),
            "2" => Ok(Self::Second),
            other => Err(ValidationError::InvalidValue {
                field: "semester",
                value: other.to_string(),
            }),
        }
    }
}

/// Kind of scheduled class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassType {
    Lecture,
    Practical,
    Tutorial,
}

impl ClassType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lecture => "Lecture",
            Self::Practical => "Practical",
            Self::Tutorial => "Tutorial",
        }
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Lecture, Self::Practical, Self::Tutorial]
            .into_iter()
            .find(|class_type| class_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "class type",
                value: s.to_string(),
            })
    }
}

/// Map 1 (Monday) ..= 7 (Sunday) to a weekday.
pub const fn weekday_from_number(number: u8) -> Option<Weekday> {
    match number {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Map a weekday to 1 (Monday) ..= 7 (Sunday).
pub const fn weekday_number(day: Weekday) -> u8 {
    match day {
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
        Weekday::Sun => 7,
    }
}

/// Serde adapter storing a weekday as its Monday-based number.
pub mod day_number {
    use chrono::Weekday;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(super::weekday_number(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let number = u8::deserialize(deserializer)?;
        super::weekday_from_number(number).ok_or_else(|| {
            D::Error::custom(format!("day of week must be 1..=7, got {number}"))
        })
    }
}

/// A scheduled class slot.
///
/// The `*_name` and `course_code` fields are snapshots taken when the entry
/// was written; renaming a lecturer later does not touch existing entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: String,
    pub course_id: String,
    pub course_name: String,
    pub course_code: String,
    pub lecturer_id: String,
    pub lecturer_name: String,
    pub classroom_id: String,
    pub classroom_name: String,
    pub department_id: String,
    pub department_name: String,
    pub level: Level,
    pub semester: Semester,
    #[serde(with = "day_number")]
    pub day_of_week: Weekday,
    /// Wall-clock start; the date component carries no meaning
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(rename = "type")]
    pub class_type: ClassType,
    /// Last modification timestamp (Unix ms)
    pub last_modified: i64,
    #[serde(default)]
    pub last_modified_by: Option<String>,
}

impl TimetableEntry {
    /// Start and end time, when both are present.
    pub fn time_range(&self) -> Option<(NaiveTime, NaiveTime)> {
        Some((self.start_time?, self.end_time?))
    }

    /// Short label, e.g. "CSC 201 - Lecture".
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.course_code, self.class_type)
    }
}

impl Record for TimetableEntry {
    const COLLECTION: Collection = Collection::Timetable;
    const INDEXED_FIELDS: &'static [Field] = &[
        Field::DepartmentId,
        Field::LecturerId,
        Field::ClassroomId,
        Field::Level,
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn field_value(&self, field: Field) -> Option<&str> {
        match field {
            Field::DepartmentId => Some(&self.department_id),
            Field::LecturerId => Some(&self.lecturer_id),
            Field::ClassroomId => Some(&self.classroom_id),
            Field::Level => Some(self.level.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry() -> TimetableEntry {
        TimetableEntry {
            id: "tt-1".to_string(),
            course_id: "crs-1".to_string(),
            course_name: "Data Structures".to_string(),
            course_code: "CSC 201".to_string(),
            lecturer_id: "lec-1".to_string(),
            lecturer_name: "Dr. Ama Mensah".to_string(),
            classroom_id: "room-1".to_string(),
            classroom_name: "Block A - 101".to_string(),
            department_id: "dep-cs".to_string(),
            department_name: "Computer Science".to_string(),
            level: Level::L200,
            semester: Semester::First,
            day_of_week: Weekday::Wed,
            start_time: NaiveTime::from_hms_opt(9, 0, 0),
            end_time: NaiveTime::from_hms_opt(11, 0, 0),
            class_type: ClassType::Lecture,
            last_modified: 1_700_000_000_000,
            last_modified_by: Some("admin-1".to_string()),
        }
    }

    #[test]
    fn test_weekday_numbers() {
        for number in 1..=7 {
            let day = weekday_from_number(number).unwrap();
            assert_eq!(weekday_number(day), number);
        }
        assert!(weekday_from_number(0).is_none());
        assert!(weekday_from_number(8).is_none());
    }

    #[test]
    fn test_document_shape() {
        let value = serde_json::to_value(entry()).unwrap();
        assert_eq!(value["dayOfWeek"], 3);
        assert_eq!(value["level"], "200");
        assert_eq!(value["semester"], "1");
        assert_eq!(value["type"], "Lecture");
        assert_eq!(value["startTime"], "09:00:00");
        assert_eq!(value["lecturerId"], "lec-1");
    }

    #[test]
    fn test_document_rejects_invalid_day() {
        let mut value = serde_json::to_value(entry()).unwrap();
        value["dayOfWeek"] = serde_json::json!(9);
        assert!(serde_json::from_value::<TimetableEntry>(value).is_err());
    }

    #[test]
    fn test_missing_times_deserialize_as_none() {
        let mut value = serde_json::to_value(entry()).unwrap();
        value.as_object_mut().unwrap().remove("endTime");
        let parsed: TimetableEntry = serde_json::from_value(value).unwrap();
        assert!(parsed.end_time.is_none());
        assert!(parsed.time_range().is_none());
    }

    #[test]
    fn test_label() {
        assert_eq!(entry().label(), "CSC 201 - Lecture");
    }

    #[test]
    fn test_field_values() {
        let entry = entry();
        assert_eq!(entry.field_value(Field::LecturerId), Some("lec-1"));
        assert_eq!(entry.field_value(Field::ClassroomId), Some("room-1"));
        assert_eq!(entry.field_value(Field::Level), Some("200"));
    }
}
