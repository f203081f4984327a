//! Shared record contract for mirrored entities

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

use super::Collection;
use crate::error::ValidationError;

/// Foreign-key fields that collections can be filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    DepartmentId,
    LecturerId,
    ClassroomId,
    Level,
}

impl Field {
    /// Column name in the local mirror.
    pub const fn column(self) -> &'static str {
        match self {
            Self::DepartmentId => "department_id",
            Self::LecturerId => "lecturer_id",
            Self::ClassroomId => "classroom_id",
            Self::Level => "level",
        }
    }

    /// Key name in remote documents.
    pub const fn document_key(self) -> &'static str {
        match self {
            Self::DepartmentId => "departmentId",
            Self::LecturerId => "lecturerId",
            Self::ClassroomId => "classroomId",
            Self::Level => "level",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.document_key())
    }
}

/// Exact-match filter on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: Field,
    pub value: String,
}

impl FieldFilter {
    pub fn new(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Whether the record's value for this field equals the filter value.
    pub fn matches<T: Record>(&self, record: &T) -> bool {
        record.field_value(self.field) == Some(self.value.as_str())
    }
}

/// An entity that lives in a remote collection and is mirrored locally.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection this record type belongs to.
    const COLLECTION: Collection;

    /// Fields this collection supports exact-match lookups on.
    const INDEXED_FIELDS: &'static [Field];

    /// Stable identifier.
    fn id(&self) -> &str;

    /// Value of an indexed field, `None` when the record has no such field.
    fn field_value(&self, field: Field) -> Option<&str>;
}

/// Reject filters on fields the record type does not index.
pub fn ensure_filterable<T: Record>(filters: &[FieldFilter]) -> Result<(), ValidationError> {
    match filters
        .iter()
        .find(|filter| !T::INDEXED_FIELDS.contains(&filter.field))
    {
        Some(filter) => Err(ValidationError::UnsupportedField {
            collection: T::COLLECTION,
            field: filter.field,
        }),
        None => Ok(()),
    }
}
