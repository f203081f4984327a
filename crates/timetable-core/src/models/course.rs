//! Course model

use serde::{Deserialize, Serialize};

use super::{Collection, Field, Level, Record, Semester};

/// A course offered by a department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    /// Course code, e.g. "CSC 201"
    pub code: String,
    pub name: String,
    pub department_id: String,
    /// Department name captured when the course was written
    pub department_name: String,
    pub credit_hours: u32,
    pub level: Level,
    pub semester: Semester,
    #[serde(default)]
    pub is_elective: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl Record for Course {
    const COLLECTION: Collection = Collection::Courses;
    const INDEXED_FIELDS: &'static [Field] = &[Field::DepartmentId, Field::Level];

    fn id(&self) -> &str {
        &self.id
    }

    fn field_value(&self, field: Field) -> Option<&str> {
        match field {
            Field::DepartmentId => Some(&self.department_id),
            Field::Level => Some(self.level.as_str()),
            Field::LecturerId | Field::ClassroomId => None,
        }
    }
}
