use db::models::class;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    #[validate(length(min = 1, max = 20, message = "Class name is required"))]
    pub name: String,

    #[validate(range(min = 1, max = 12, message = "Grade must be between 1 and 12"))]
    pub grade: i32,

    pub teacher_id: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassRequest {
    #[validate(length(min = 1, max = 20, message = "Class name is required"))]
    pub name: Option<String>,

    #[validate(range(min = 1, max = 12, message = "Grade must be between 1 and 12"))]
    pub grade: Option<i32>,

    /// Absent → unchanged; `null` → unassign; a value → assign that teacher.
    #[serde(default)]
    pub teacher_id: Option<Option<i64>>,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClassResponse {
    pub id: i64,
    pub name: String,
    pub grade: i32,
    pub teacher_id: Option<i64>,
    pub teacher_name: Option<String>,
    pub student_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<class::Model> for ClassResponse {
    fn from(c: class::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            grade: c.grade,
            teacher_id: c.teacher_id,
            teacher_name: None,
            student_count: 0,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

impl ClassResponse {
    pub fn from_with_details(
        c: class::Model,
        teacher_name: Option<String>,
        student_count: i64,
    ) -> Self {
        let mut base = Self::from(c);
        base.teacher_name = teacher_name;
        base.student_count = student_count;
        base
    }
}

/// Why a class deletion is blocked; returned as the `data` of the 409 so
/// the client can tell the user what must move first.
#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClassUsage {
    pub student_count: i64,
    pub attendance_count: i64,
}
