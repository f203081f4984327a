//! Classroom model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Collection, Field, Record};
use crate::error::ValidationError;

/// Kind of teaching space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RoomType {
    #[default]
    #[serde(rename = "Lecture Hall")]
    LectureHall,
    #[serde(rename = "Laboratory")]
    Laboratory,
    #[serde(rename = "Workshop")]
    Workshop,
    #[serde(rename = "Seminar Room")]
    SeminarRoom,
}

impl RoomType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LectureHall => "Lecture Hall",
            Self::Laboratory => "Laboratory",
            Self::Workshop => "Workshop",
            Self::SeminarRoom => "Seminar Room",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::LectureHall,
            Self::Laboratory,
            Self::Workshop,
            Self::SeminarRoom,
        ]
        .into_iter()
        .find(|room_type| room_type.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "room type",
            value: s.to_string(),
        })
    }
}

/// A bookable room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub building_name: Option<String>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    pub capacity: u32,
    #[serde(rename = "type", default)]
    pub room_type: RoomType,
    #[serde(default)]
    pub has_projector: bool,
    #[serde(default)]
    pub has_air_condition: bool,
    #[serde(default)]
    pub has_computers: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Classroom {
    /// "Building - Room" when a building is known, the room name otherwise.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.building_name.as_deref().filter(|b| !b.is_empty()) {
            Some(building) => match self.room_number.as_deref().filter(|r| !r.is_empty()) {
                Some(room) => format!("{building} - {room}"),
                None => building.to_string(),
            },
            None => self.name.clone(),
        }
    }
}

impl Record for Classroom {
    const COLLECTION: Collection = Collection::Classrooms;
    const INDEXED_FIELDS: &'static [Field] = &[];

    fn id(&self) -> &str {
        &self.id
    }

    fn field_value(&self, _field: Field) -> Option<&str> {
        None
    }
}
