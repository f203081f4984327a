//! Lecturer model

use serde::{Deserialize, Serialize};

use super::{Collection, Field, Record};

/// A member of teaching staff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecturer {
    pub id: String,
    /// Linked login account, if the lecturer has one
    #[serde(default)]
    pub user_id: Option<String>,
    pub staff_id: String,
    /// Honorific such as "Dr." or "Prof."
    #[serde(default)]
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub department_id: String,
    /// Department name captured when the lecturer was written
    pub department_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl Lecturer {
    /// Display name: title, first name and last name.
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(title) = self.title.as_deref().filter(|title| !title.is_empty()) {
            parts.push(title);
        }
        parts.push(self.first_name.as_str());
        parts.push(self.last_name.as_str());
        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Record for Lecturer {
    const COLLECTION: Collection = Collection::Lecturers;
    const INDEXED_FIELDS: &'static [Field] = &[Field::DepartmentId];

    fn id(&self) -> &str {
        &self.id
    }

    fn field_value(&self, field: Field) -> Option<&str> {
        match field {
            Field::DepartmentId => Some(&self.department_id),
            Field::LecturerId | Field::ClassroomId | Field::Level => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecturer(title: Option<&str>) -> Lecturer {
        Lecturer {
            id: "lec-1".to_string(),
            user_id: None,
            staff_id: "S-100".to_string(),
            title: title.map(str::to_string),
            first_name: "Ama".to_string(),
            last_name: "Mensah".to_string(),
            department_id: "dep-cs".to_string(),
            department_name: "Computer Science".to_string(),
            email: None,
            phone_number: None,
        }
    }

    #[test]
    fn test_full_name_with_title() {
        assert_eq!(lecturer(Some("Dr.")).full_name(), "Dr. Ama Mensah");
    }

    #[test]
    fn test_full_name_skips_empty_title() {
        assert_eq!(lecturer(None).full_name(), "Ama Mensah");
        assert_eq!(lecturer(Some("")).full_name(), "Ama Mensah");
    }
}
