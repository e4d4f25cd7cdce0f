use db::models::attendance_record::{self, AttendanceStatus};
use db::models::{class, student};
use sea_orm::prelude::{Date, Time};
use serde::{Deserialize, Serialize};

/// Body for `POST /api/attendance`.
///
/// `studentName`, `classId` and `className` are display hints some clients
/// send along; matching is always by `studentId`. A missing `date` means
/// today. `reason` is folded into `notes` when `notes` is absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    pub student_id: i64,
    #[allow(dead_code)]
    pub student_name: Option<String>,
    #[allow(dead_code)]
    pub class_id: Option<i64>,
    #[allow(dead_code)]
    pub class_name: Option<String>,
    pub date: Option<String>,
    pub status: String,
    pub check_in_time: Option<String>,
    pub notes: Option<String>,
    pub reason: Option<String>,
}

/// Filters for `GET /api/attendance`. `date` and `startDate`/`endDate` are
/// mutually exclusive; a single `date` wins when both are present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecordResponse {
    pub student_id: i64,
    pub student_name: Option<String>,
    pub nisn: Option<String>,
    pub class_id: Option<i64>,
    pub class_name: Option<String>,
    pub date: String,
    pub status: AttendanceStatus,
    pub check_in_time: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub attendance_records: Vec<AttendanceRecordResponse>,
}

impl AttendanceRecordResponse {
    pub fn build(
        record: attendance_record::Model,
        student: Option<&student::Model>,
        class: Option<&class::Model>,
    ) -> Self {
        Self {
            student_id: record.student_id,
            student_name: student.map(|s| s.name.clone()),
            nisn: student.map(|s| s.nisn.clone()),
            class_id: student.map(|s| s.class_id),
            class_name: class.map(|c| c.name.clone()),
            date: record.date.format("%Y-%m-%d").to_string(),
            status: record.status,
            check_in_time: record.check_in_time.map(|t| t.format("%H:%M").to_string()),
            notes: record.notes,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

pub fn parse_status(raw: &str) -> Result<AttendanceStatus, String> {
    raw.parse::<AttendanceStatus>().map_err(|_| {
        format!("Invalid status '{raw}': expected HADIR, TERLAMBAT, TIDAK_HADIR or IZIN")
    })
}

pub fn parse_date(raw: &str, field: &str) -> Result<Date, String> {
    Date::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("Invalid {field} '{raw}': expected YYYY-MM-DD"))
}

/// Accepts `HH:MM:SS` or the shorter `HH:MM` clients usually send.
pub fn parse_check_in_time(raw: &str) -> Result<Time, String> {
    Time::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| Time::parse_from_str(raw, "%H:%M"))
        .map_err(|_| format!("Invalid checkInTime '{raw}': expected HH:MM or HH:MM:SS"))
}
