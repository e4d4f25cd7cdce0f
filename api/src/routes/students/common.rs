use db::models::student::{self, Gender, StudentStatus};
use sea_orm::prelude::Date;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static::lazy_static! {
    // National student number: 10 digits.
    static ref NISN_REGEX: regex::Regex = regex::Regex::new(r"^\d{10}$").unwrap();
}

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    #[validate(regex(path = *NISN_REGEX, message = "NISN must be exactly 10 digits"))]
    pub nisn: String,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    pub class_id: i64,

    /// "L" or "P".
    pub gender: String,

    /// ISO date, `YYYY-MM-DD`.
    pub birth_date: String,

    #[validate(length(min = 1, message = "Guardian name is required"))]
    pub guardian_name: String,

    pub guardian_phone: Option<String>,

    /// "ACTIVE" (default) or "INACTIVE".
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[validate(regex(path = *NISN_REGEX, message = "NISN must be exactly 10 digits"))]
    pub nisn: Option<String>,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,

    pub class_id: Option<i64>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,

    #[validate(length(min = 1, message = "Guardian name is required"))]
    pub guardian_name: Option<String>,

    pub guardian_phone: Option<String>,
    pub status: Option<String>,
}

/// Filters for the student list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub class_id: Option<i64>,
    /// "ACTIVE" | "INACTIVE"
    pub status: Option<String>,
    /// Substring match on name or NISN.
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: i64,
    pub nisn: String,
    pub name: String,
    pub class_id: i64,
    pub class_name: Option<String>,
    pub gender: String,
    pub birth_date: String,
    pub guardian_name: String,
    pub guardian_phone: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<student::Model> for StudentResponse {
    fn from(s: student::Model) -> Self {
        Self {
            id: s.id,
            nisn: s.nisn,
            name: s.name,
            class_id: s.class_id,
            class_name: None,
            gender: s.gender.to_string(),
            birth_date: s.birth_date.format("%Y-%m-%d").to_string(),
            guardian_name: s.guardian_name,
            guardian_phone: s.guardian_phone,
            status: s.status.to_string(),
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

impl StudentResponse {
    pub fn with_class_name(s: student::Model, class_name: Option<String>) -> Self {
        let mut base = Self::from(s);
        base.class_name = class_name;
        base
    }
}

pub fn parse_gender(raw: &str) -> Result<Gender, String> {
    raw.parse::<Gender>()
        .map_err(|_| "Invalid gender: must be L or P".to_string())
}

pub fn parse_student_status(raw: &str) -> Result<StudentStatus, String> {
    raw.parse::<StudentStatus>()
        .map_err(|_| "Invalid status: must be ACTIVE or INACTIVE".to_string())
}

pub fn parse_iso_date(raw: &str, field: &str) -> Result<Date, String> {
    Date::parse_from_str(raw, "%Y-%m-%d").map_err(|_| format!("Invalid {field}: expected YYYY-MM-DD"))
}
