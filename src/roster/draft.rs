//! Draft record held by the create/edit form.

use std::fmt;

use crate::models::employee::Employee;

/// Form field that must be filled before submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Name,
    Position,
    Department,
}

impl RequiredField {
    pub const ALL: [RequiredField; 3] = [RequiredField::Name, RequiredField::Position, RequiredField::Department];

    pub fn label(self) -> &'static str {
        match self {
            RequiredField::Name => "Name",
            RequiredField::Position => "Position",
            RequiredField::Department => "Department",
        }
    }

    fn value(self, employee: &Employee) -> &str {
        match self {
            RequiredField::Name => &employee.name,
            RequiredField::Position => &employee.position,
            RequiredField::Department => &employee.department,
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is required", self.label())
    }
}

/// The single record being composed or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub employee: Employee,
    pub is_editing: bool,
}

impl Draft {
    /// Reset the form to an empty draft.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Load an existing record for editing.
    pub fn edit(&mut self, employee: &Employee) {
        self.employee = employee.clone();
        self.is_editing = true;
    }

    /// Fields that are empty (or whitespace only), in form order.
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|field| field.value(&self.employee).trim().is_empty())
            .collect()
    }

    /// Return the record to submit, or the first missing field.
    pub fn validate(&self) -> Result<Employee, RequiredField> {
        match self.missing_fields().first() {
            Some(field) => Err(*field),
            None => Ok(self.employee.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> Draft {
        Draft {
            employee: Employee {
                id: 0,
                name: "Alice".to_string(),
                position: "Engineer".to_string(),
                department: "R&D".to_string(),
            },
            is_editing: false,
        }
    }

    #[test]
    fn test_complete_draft_validates() {
        let draft = filled();
        assert_eq!(draft.validate(), Ok(draft.employee.clone()));
    }

    #[test]
    fn test_each_missing_field_is_named() {
        let mut draft = filled();
        draft.employee.position = "   ".to_string();
        assert_eq!(draft.validate(), Err(RequiredField::Position));
        assert_eq!(RequiredField::Position.to_string(), "Position is required");

        draft.employee.name.clear();
        assert_eq!(draft.validate(), Err(RequiredField::Name));
        assert_eq!(
            draft.missing_fields(),
            vec![RequiredField::Name, RequiredField::Position]
        );
    }

    #[test]
    fn test_edit_then_reset() {
        let mut draft = Draft::default();
        let record = Employee {
            id: 9,
            ..filled().employee
        };

        draft.edit(&record);
        assert!(draft.is_editing);
        assert_eq!(draft.employee.id, 9);

        draft.reset();
        assert!(!draft.is_editing);
        assert!(draft.employee.is_draft());
        assert_eq!(draft.missing_fields().len(), 3);
    }
}
