//! Department model

use serde::{Deserialize, Serialize};

use super::{Collection, Field, Record};

/// An academic department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub faculty_id: Option<String>,
    #[serde(default)]
    pub faculty_name: Option<String>,
    /// User id of the head of department
    #[serde(default)]
    pub hod_id: Option<String>,
}

impl Department {
    pub fn new(id: impl Into<String>, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            faculty_id: None,
            faculty_name: None,
            hod_id: None,
        }
    }
}

impl Record for Department {
    const COLLECTION: Collection = Collection::Departments;
    const INDEXED_FIELDS: &'static [Field] = &[];

    fn id(&self) -> &str {
        &self.id
    }

    fn field_value(&self, _field: Field) -> Option<&str> {
        None
    }
}
