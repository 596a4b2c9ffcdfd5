//! Employee record and paged list DTOs.

use serde::{Deserialize, Serialize};

/// Employee record as exchanged with the backend.
///
/// `id == 0` marks a draft the server has not assigned an id to yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub position: String,
    pub department: String,
}

impl Employee {
    /// Id carried by records that were never saved.
    pub const DRAFT_ID: i64 = 0;

    /// Empty draft record.
    pub fn draft() -> Self {
        Self::default()
    }

    /// Check whether this record has been assigned an id by the server.
    pub fn is_draft(&self) -> bool {
        self.id == Self::DRAFT_ID
    }
}

/// One page of employees from `GET /api/employees`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePage {
    pub content: Vec<Employee>,
    pub total_elements: u64,
}

impl EmployeePage {
    /// Page holding a single record, as produced by a name lookup.
    pub fn single(employee: Employee) -> Self {
        Self {
            content: vec![employee],
            total_elements: 1,
        }
    }
}
