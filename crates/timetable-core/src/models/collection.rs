//! Remote collection names

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A remote collection mirrored locally.
///
/// The string form doubles as the local table name and the sync ledger key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Departments,
    Courses,
    Lecturers,
    Classrooms,
    Timetable,
}

impl Collection {
    /// Every collection, in the order reference data is usually loaded.
    pub const ALL: [Self; 5] = [
        Self::Departments,
        Self::Courses,
        Self::Lecturers,
        Self::Classrooms,
        Self::Timetable,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Departments => "departments",
            Self::Courses => "courses",
            Self::Lecturers => "lecturers",
            Self::Classrooms => "classrooms",
            Self::Timetable => "timetable",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|collection| collection.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownCollection(s.to_string()))
    }
}
