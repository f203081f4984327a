//! Row mapping between mirrored records and their tables

use chrono::NaiveTime;
use libsql::{Row, Value};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{Error, Result, ValidationError};
use crate::models::{
    weekday_from_number, weekday_number, Classroom, Collection, Course, Department, Lecturer,
    Record, TimetableEntry,
};

// Fraction is written only when non-zero, so whole-second rows stay `HH:MM:SS`
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// A record with a table in the local mirror.
///
/// `COLUMNS` must start with `id`, and `to_values` / `from_row` must follow
/// the same column order. `display_cmp` must agree with `ORDER_BY`.
pub trait MirrorTable: Record {
    const COLUMNS: &'static [&'static str];

    /// `ORDER BY` clause used for full scans and lookups
    const ORDER_BY: &'static str;

    /// In-memory counterpart of `ORDER_BY` for freshly fetched batches
    fn display_cmp(&self, other: &Self) -> Ordering;

    fn to_values(&self) -> Vec<Value>;

    fn from_row(row: &Row) -> Result<Self>;

    fn table() -> &'static str {
        Self::COLLECTION.as_str()
    }
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text)
}

fn flag(value: bool) -> Value {
    Value::Integer(i64::from(value))
}

fn time_value(value: Option<NaiveTime>) -> Value {
    value.map_or(Value::Null, |time| {
        Value::Text(time.format(TIME_FORMAT).to_string())
    })
}

fn corrupt(collection: Collection, detail: impl std::fmt::Display) -> Error {
    Error::CorruptRecord(format!("{collection}: {detail}"))
}

fn parse_column<T>(collection: Collection, raw: &str) -> Result<T>
where
    T: FromStr<Err = ValidationError>,
{
    raw.parse().map_err(|error| corrupt(collection, error))
}

fn parse_time(collection: Collection, raw: Option<String>) -> Result<Option<NaiveTime>> {
    raw.map(|raw| {
        NaiveTime::parse_from_str(&raw, TIME_FORMAT)
            .map_err(|error| corrupt(collection, format!("invalid time '{raw}': {error}")))
    })
    .transpose()
}

fn unsigned(collection: Collection, raw: i64) -> Result<u32> {
    u32::try_from(raw).map_err(|_| corrupt(collection, format!("value out of range: {raw}")))
}

impl MirrorTable for Department {
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "code", "faculty_id", "faculty_name", "hod_id"];
    const ORDER_BY: &'static str = "name ASC";

    fn display_cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.id),
            text(&self.name),
            text(&self.code),
            optional_text(self.faculty_id.as_deref()),
            optional_text(self.faculty_name.as_deref()),
            optional_text(self.hod_id.as_deref()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            code: row.get(2)?,
            faculty_id: row.get(3)?,
            faculty_name: row.get(4)?,
            hod_id: row.get(5)?,
        })
    }
}

impl MirrorTable for Course {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "code",
        "name",
        "department_id",
        "department_name",
        "credit_hours",
        "level",
        "semester",
        "is_elective",
        "description",
    ];
    const ORDER_BY: &'static str = "code ASC";

    fn display_cmp(&self, other: &Self) -> Ordering {
        self.code.cmp(&other.code)
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.id),
            text(&self.code),
            text(&self.name),
            text(&self.department_id),
            text(&self.department_name),
            Value::Integer(i64::from(self.credit_hours)),
            text(self.level.as_str()),
            text(self.semester.as_str()),
            flag(self.is_elective),
            optional_text(self.description.as_deref()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        let collection = Self::COLLECTION;
        Ok(Self {
            id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
            department_id: row.get(3)?,
            department_name: row.get(4)?,
            credit_hours: unsigned(collection, row.get(5)?)?,
            level: parse_column(collection, &row.get::<String>(6)?)?,
            semester: parse_column(collection, &row.get::<String>(7)?)?,
            is_elective: row.get::<i64>(8)? != 0,
            description: row.get(9)?,
        })
    }
}

impl MirrorTable for Lecturer {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "staff_id",
        "title",
        "first_name",
        "last_name",
        "department_id",
        "department_name",
        "email",
        "phone_number",
    ];
    const ORDER_BY: &'static str = "last_name ASC, first_name ASC";

    fn display_cmp(&self, other: &Self) -> Ordering {
        self.last_name
            .cmp(&other.last_name)
            .then_with(|| self.first_name.cmp(&other.first_name))
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.id),
            optional_text(self.user_id.as_deref()),
            text(&self.staff_id),
            optional_text(self.title.as_deref()),
            text(&self.first_name),
            text(&self.last_name),
            text(&self.department_id),
            text(&self.department_name),
            optional_text(self.email.as_deref()),
            optional_text(self.phone_number.as_deref()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            staff_id: row.get(2)?,
            title: row.get(3)?,
            first_name: row.get(4)?,
            last_name: row.get(5)?,
            department_id: row.get(6)?,
            department_name: row.get(7)?,
            email: row.get(8)?,
            phone_number: row.get(9)?,
        })
    }
}

impl MirrorTable for Classroom {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "building_name",
        "floor",
        "room_number",
        "capacity",
        "type",
        "has_projector",
        "has_air_condition",
        "has_computers",
        "notes",
    ];
    const ORDER_BY: &'static str = "building_name ASC, room_number ASC";

    // NULL sorts first in SQLite, as `None` does here
    fn display_cmp(&self, other: &Self) -> Ordering {
        self.building_name
            .cmp(&other.building_name)
            .then_with(|| self.room_number.cmp(&other.room_number))
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.id),
            text(&self.name),
            optional_text(self.building_name.as_deref()),
            optional_text(self.floor.as_deref()),
            optional_text(self.room_number.as_deref()),
            Value::Integer(i64::from(self.capacity)),
            text(self.room_type.as_str()),
            flag(self.has_projector),
            flag(self.has_air_condition),
            flag(self.has_computers),
            optional_text(self.notes.as_deref()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        let collection = Self::COLLECTION;
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            building_name: row.get(2)?,
            floor: row.get(3)?,
            room_number: row.get(4)?,
            capacity: unsigned(collection, row.get(5)?)?,
            room_type: parse_column(collection, &row.get::<String>(6)?)?,
            has_projector: row.get::<i64>(7)? != 0,
            has_air_condition: row.get::<i64>(8)? != 0,
            has_computers: row.get::<i64>(9)? != 0,
            notes: row.get(10)?,
        })
    }
}

impl MirrorTable for TimetableEntry {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "course_id",
        "course_name",
        "course_code",
        "lecturer_id",
        "lecturer_name",
        "classroom_id",
        "classroom_name",
        "department_id",
        "department_name",
        "level",
        "semester",
        "day_of_week",
        "start_time",
        "end_time",
        "type",
        "last_modified",
        "last_modified_by",
    ];
    // HH:MM:SS[.fff] text sorts in wall-clock order
    const ORDER_BY: &'static str = "day_of_week ASC, start_time ASC";

    fn display_cmp(&self, other: &Self) -> Ordering {
        weekday_number(self.day_of_week)
            .cmp(&weekday_number(other.day_of_week))
            .then_with(|| self.start_time.cmp(&other.start_time))
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.id),
            text(&self.course_id),
            text(&self.course_name),
            text(&self.course_code),
            text(&self.lecturer_id),
            text(&self.lecturer_name),
            text(&self.classroom_id),
            text(&self.classroom_name),
            text(&self.department_id),
            text(&self.department_name),
            text(self.level.as_str()),
            text(self.semester.as_str()),
            Value::Integer(i64::from(weekday_number(self.day_of_week))),
            time_value(self.start_time),
            time_value(self.end_time),
            text(self.class_type.as_str()),
            Value::Integer(self.last_modified),
            optional_text(self.last_modified_by.as_deref()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        let collection = Self::COLLECTION;
        let day_number = row.get::<i64>(12)?;
        let day_of_week = u8::try_from(day_number)
            .ok()
            .and_then(weekday_from_number)
            .ok_or_else(|| corrupt(collection, format!("invalid day_of_week {day_number}")))?;

        Ok(Self {
            id: row.get(0)?,
            course_id: row.get(1)?,
            course_name: row.get(2)?,
            course_code: row.get(3)?,
            lecturer_id: row.get(4)?,
            lecturer_name: row.get(5)?,
            classroom_id: row.get(6)?,
            classroom_name: row.get(7)?,
            department_id: row.get(8)?,
            department_name: row.get(9)?,
            level: parse_column(collection, &row.get::<String>(10)?)?,
            semester: parse_column(collection, &row.get::<String>(11)?)?,
            day_of_week,
            start_time: parse_time(collection, row.get(13)?)?,
            end_time: parse_time(collection, row.get(14)?)?,
            class_type: parse_column(collection, &row.get::<String>(15)?)?,
            last_modified: row.get(16)?,
            last_modified_by: row.get(17)?,
        })
    }
}
