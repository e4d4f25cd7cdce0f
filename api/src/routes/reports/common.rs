use db::models::attendance_record::AttendanceStatus;
use db::report::{ClassReport, DailyStats, RangeStats, ReconciledEntry};
use sea_orm::prelude::Date;
use serde::{Deserialize, Serialize};

pub fn parse_date(raw: &str, field: &str) -> Result<Date, String> {
    Date::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("Invalid {field} '{raw}': expected YYYY-MM-DD"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyQuery {
    pub date: Option<String>,
    pub class_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub class_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// One reconciled per-student row in the daily report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub student_id: i64,
    pub name: String,
    pub nisn: String,
    pub status: AttendanceStatus,
    pub check_in_time: Option<String>,
    pub notes: Option<String>,
    /// False when the row is the absent default rather than a stored record.
    pub recorded: bool,
}

impl From<&ReconciledEntry> for ReportEntry {
    fn from(e: &ReconciledEntry) -> Self {
        Self {
            student_id: e.student_id,
            name: e.student_name.clone(),
            nisn: e.nisn.clone(),
            status: e.status,
            check_in_time: e.check_in_time.map(|t| t.format("%H:%M").to_string()),
            notes: e.notes.clone(),
            recorded: e.recorded,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatsDto {
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub excused: i64,
    pub total: i64,
    pub attendance_rate: f64,
}

impl From<DailyStats> for DailyStatsDto {
    fn from(s: DailyStats) -> Self {
        Self {
            present: s.present,
            late: s.late,
            absent: s.absent,
            excused: s.excused,
            total: s.total(),
            attendance_rate: s.attendance_rate,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyClassReport {
    pub class_id: i64,
    pub class_name: String,
    pub teacher_name: Option<String>,
    pub student_count: i64,
    pub entries: Vec<ReportEntry>,
    pub stats: DailyStatsDto,
}

impl DailyClassReport {
    pub fn build(report: &ClassReport) -> Self {
        Self {
            class_id: report.class.id,
            class_name: report.class.name.clone(),
            teacher_name: report.teacher.as_ref().map(|t| t.name.clone()),
            student_count: report.roster_size as i64,
            entries: report.entries.iter().map(ReportEntry::from).collect(),
            stats: report.daily_stats().into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReportResponse {
    pub date: String,
    pub classes: Vec<DailyClassReport>,
}

/// Per-class averages over a date range, one flat row per class.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryClassRow {
    pub class_id: i64,
    pub class_name: String,
    pub teacher_name: Option<String>,
    pub student_count: i64,
    pub average_present: f64,
    pub average_late: f64,
    pub average_absent: f64,
    pub average_excused: f64,
    pub attendance_rate: f64,
}

impl SummaryClassRow {
    pub fn build(report: &ClassReport, stats: &RangeStats) -> Self {
        Self {
            class_id: report.class.id,
            class_name: report.class.name.clone(),
            teacher_name: report.teacher.as_ref().map(|t| t.name.clone()),
            student_count: report.roster_size as i64,
            average_present: stats.present,
            average_late: stats.late,
            average_absent: stats.absent,
            average_excused: stats.excused,
            attendance_rate: stats.attendance_rate,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub start_date: String,
    pub end_date: String,
    pub school_days: i64,
    pub classes: Vec<SummaryClassRow>,
}
