use super::common::{
    DailyClassReport, DailyQuery, DailyReportResponse, RangeQuery, SummaryClassRow,
    SummaryResponse, parse_date,
};
use crate::auth::guards::{ClassScope, Empty, Principal};
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use chrono::{Datelike, NaiveDate, Utc};
use db::models::attendance_record::AttendanceStatus;
use db::report::{self, ClassReport, ReportError};
use sea_orm::DatabaseConnection;
use util::state::AppState;

fn bad_request(msg: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<Empty>::error(msg)),
    )
        .into_response()
}

fn report_error(e: ReportError) -> Response {
    match e {
        ReportError::ClassNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Class not found")),
        )
            .into_response(),
        ReportError::Database(err) => {
            tracing::error!(error = %err, "DB error generating report");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error(
                    "Database error generating report",
                )),
            )
                .into_response()
        }
    }
}

/// Reports for whatever the caller may see: every class for admins, the own
/// class for teachers, nothing for a teacher without a homeroom class.
async fn scoped_reports(
    db: &DatabaseConnection,
    scope: ClassScope,
    dates: &[NaiveDate],
) -> Result<Vec<ClassReport>, ReportError> {
    match scope {
        ClassScope::All => report::build_reports(db, None, dates).await,
        ClassScope::Class(class_id) => report::build_reports(db, Some(class_id), dates).await,
        ClassScope::Nothing => Ok(Vec::new()),
    }
}

/// Parses the required `startDate`/`endDate` pair shared by the summary and
/// print endpoints.
fn parse_range(q: &RangeQuery) -> Result<(NaiveDate, NaiveDate), Response> {
    let (start_raw, end_raw) = match (q.start_date.as_deref(), q.end_date.as_deref()) {
        (Some(s), Some(e)) => (s, e),
        _ => return Err(bad_request("startDate and endDate are required")),
    };
    let start = parse_date(start_raw, "startDate").map_err(bad_request)?;
    let end = parse_date(end_raw, "endDate").map_err(bad_request)?;
    if start > end {
        return Err(bad_request("startDate must not be after endDate"));
    }
    Ok((start, end))
}

/// GET /api/reports/daily
///
/// Reconciled per-student rows plus raw counts for one day, grouped per
/// class. Admins see every class unless `classId` narrows it; teachers see
/// their own class.
///
/// **Query**:
/// - `date` *(optional)* — defaults to today
/// - `classId` *(optional)*
pub async fn daily_report(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(q): Query<DailyQuery>,
) -> impl IntoResponse {
    let db = state.db();

    let date = match q.date.as_deref() {
        Some(raw) => match parse_date(raw, "date") {
            Ok(d) => d,
            Err(msg) => return bad_request(msg),
        },
        None => Utc::now().date_naive(),
    };
    let scope = match principal.scope_class(q.class_id) {
        Ok(s) => s,
        Err(denied) => return denied.into_response(),
    };

    let reports = match scoped_reports(db, scope, &[date]).await {
        Ok(r) => r,
        Err(e) => return report_error(e),
    };

    let body = DailyReportResponse {
        date: date.format("%Y-%m-%d").to_string(),
        classes: reports.iter().map(DailyClassReport::build).collect(),
    };
    (
        StatusCode::OK,
        Json(ApiResponse::success(body, "Daily report generated")),
    )
        .into_response()
}

/// GET /api/reports/summary
///
/// Per-class daily averages over the school days (weekdays) in the range.
/// The range is capped at 31 calendar days from `startDate`.
///
/// **Query**:
/// - `startDate`, `endDate` *(required)* — `YYYY-MM-DD`
/// - `classId` *(optional)*
pub async fn summary_report(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(q): Query<RangeQuery>,
) -> impl IntoResponse {
    let db = state.db();

    let (start, end) = match parse_range(&q) {
        Ok(range) => range,
        Err(resp) => return resp,
    };
    let scope = match principal.scope_class(q.class_id) {
        Ok(s) => s,
        Err(denied) => return denied.into_response(),
    };

    let dates = report::school_days(start, end);
    let reports = match scoped_reports(db, scope, &dates).await {
        Ok(r) => r,
        Err(e) => return report_error(e),
    };

    let classes = reports
        .iter()
        .map(|r| {
            let stats = r.range_stats();
            SummaryClassRow::build(r, &stats)
        })
        .collect();
    let body = SummaryResponse {
        start_date: start.format("%Y-%m-%d").to_string(),
        end_date: end.format("%Y-%m-%d").to_string(),
        school_days: dates.len() as i64,
        classes,
    };
    (
        StatusCode::OK,
        Json(ApiResponse::success(body, "Summary report generated")),
    )
        .into_response()
}

/// GET /api/reports/export
///
/// Daily report as a `text/csv` attachment, one row per class. Cells are
/// comma-joined without quoting; names with commas would break the row,
/// which is accepted for this data.
///
/// **Query**:
/// - `date` *(optional)* — defaults to today
/// - `classId` *(optional)*
///
/// **Response**: attachment `laporan-absen-<date>.csv` with header
/// `Tanggal,Kelas,Total Siswa,Hadir,Terlambat,Tidak Hadir,Izin,Tingkat Kehadiran (%)`.
pub async fn export_daily_csv(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(q): Query<DailyQuery>,
) -> impl IntoResponse {
    let db = state.db();

    let date = match q.date.as_deref() {
        Some(raw) => match parse_date(raw, "date") {
            Ok(d) => d,
            Err(msg) => return bad_request(msg),
        },
        None => Utc::now().date_naive(),
    };
    let scope = match principal.scope_class(q.class_id) {
        Ok(s) => s,
        Err(denied) => return denied.into_response(),
    };

    let reports = match scoped_reports(db, scope, &[date]).await {
        Ok(r) => r,
        Err(e) => return report_error(e),
    };

    let mut csv = String::from(
        "Tanggal,Kelas,Total Siswa,Hadir,Terlambat,Tidak Hadir,Izin,Tingkat Kehadiran (%)\n",
    );
    let tanggal = date.format("%d/%m/%Y").to_string();
    for r in &reports {
        let stats = r.daily_stats();
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{:.2}\n",
            tanggal,
            r.class.name,
            r.roster_size,
            stats.present,
            stats.late,
            stats.absent,
            stats.excused,
            stats.attendance_rate
        ));
    }

    let filename = format!("laporan-absen-{}.csv", date.format("%Y-%m-%d"));
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
            .unwrap_or(HeaderValue::from_static("attachment")),
    );

    (StatusCode::OK, (headers, csv)).into_response()
}

/// GET /api/reports/print
///
/// Printable attendance grid for one class: one row per student, one column
/// per school day in the range, single-letter statuses, per-student totals
/// and a class summary. A4 landscape via print CSS.
///
/// **Query**:
/// - `classId` — required for admins; teachers always print their own class
/// - `startDate`, `endDate` *(required)* — `YYYY-MM-DD`
pub async fn print_report(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(q): Query<RangeQuery>,
) -> impl IntoResponse {
    let db = state.db();

    let (start, end) = match parse_range(&q) {
        Ok(range) => range,
        Err(resp) => return resp,
    };
    let scope = match principal.scope_class(q.class_id) {
        Ok(s) => s,
        Err(denied) => return denied.into_response(),
    };
    let class_id = match scope {
        ClassScope::Class(id) => id,
        ClassScope::All => return bad_request("classId is required"),
        ClassScope::Nothing => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error("No class assigned to this account")),
            )
                .into_response();
        }
    };

    let dates = report::school_days(start, end);
    let report = match report::build_class_report(db, class_id, &dates).await {
        Ok(r) => r,
        Err(e) => return report_error(e),
    };

    Html(render_print_document(&report, start, end)).into_response()
}

fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_print_document(report: &ClassReport, start: NaiveDate, end: NaiveDate) -> String {
    let dates = &report.dates;

    let mut date_headers = String::new();
    for d in dates {
        date_headers.push_str(&format!("<th class=\"day\">{}/{}</th>", d.day(), d.month()));
    }

    // One reconciled row per (student, date) in roster-then-date order, so
    // fixed-size chunks recover the per-student rows.
    let mut body_rows = String::new();
    if !dates.is_empty() {
        for (i, per_student) in report.entries.chunks(dates.len()).enumerate() {
            let first = &per_student[0];
            let mut cells = String::new();
            let mut h = 0;
            let mut t = 0;
            let mut a = 0;
            let mut iz = 0;
            for entry in per_student {
                match entry.status {
                    AttendanceStatus::Hadir => h += 1,
                    AttendanceStatus::Terlambat => t += 1,
                    AttendanceStatus::TidakHadir => a += 1,
                    AttendanceStatus::Izin => iz += 1,
                }
                cells.push_str(&format!(
                    "<td class=\"st st-{}\">{}</td>",
                    entry.status.letter().to_lowercase(),
                    entry.status.letter()
                ));
            }
            body_rows.push_str(&format!(
                "<tr><td class=\"num\">{}</td><td class=\"name\">{}</td><td class=\"nisn\">{}</td>{}<td class=\"tot\">{}</td><td class=\"tot\">{}</td><td class=\"tot\">{}</td><td class=\"tot\">{}</td></tr>\n",
                i + 1,
                esc(&first.student_name),
                esc(&first.nisn),
                cells,
                h,
                t,
                a,
                iz
            ));
        }
    }

    let stats = report.daily_stats();
    let teacher_name = report
        .teacher
        .as_ref()
        .map(|u| esc(&u.name))
        .unwrap_or_else(|| "-".to_string());
    let period = format!("{} - {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y"));

    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="utf-8">
<title>Laporan Absensi Kelas {class_name}</title>
<style>
    @page {{ size: A4 landscape; margin: 12mm; }}
    body {{ font-family: Arial, sans-serif; font-size: 11px; color: #111; }}
    h1 {{ font-size: 16px; margin: 0 0 2px 0; text-align: center; }}
    .meta {{ text-align: center; margin-bottom: 10px; }}
    table {{ border-collapse: collapse; width: 100%; }}
    th, td {{ border: 1px solid #444; padding: 2px 4px; text-align: center; }}
    th {{ background: #eee; }}
    td.name {{ text-align: left; white-space: nowrap; }}
    td.nisn {{ white-space: nowrap; }}
    td.st-a {{ color: #b00; }}
    .summary {{ margin-top: 10px; }}
    .summary td {{ border: none; text-align: left; padding: 1px 12px 1px 0; }}
    @media print {{ .noprint {{ display: none; }} }}
</style>
</head>
<body>
<h1>Laporan Absensi Kelas {class_name}</h1>
<div class="meta">Wali Kelas: {teacher_name} &middot; Periode: {period}</div>
<table>
<thead>
<tr><th class="num">No</th><th>Nama</th><th>NISN</th>{date_headers}<th>H</th><th>T</th><th>A</th><th>I</th></tr>
</thead>
<tbody>
{body_rows}</tbody>
</table>
<table class="summary">
<tr><td>Hadir: {present}</td><td>Terlambat: {late}</td><td>Tidak Hadir: {absent}</td><td>Izin: {excused}</td><td>Tingkat Kehadiran: {rate:.2}%</td></tr>
</table>
</body>
</html>
"#,
        class_name = esc(&report.class.name),
        teacher_name = teacher_name,
        period = period,
        date_headers = date_headers,
        body_rows = body_rows,
        present = stats.present,
        late = stats.late,
        absent = stats.absent,
        excused = stats.excused,
        rate = stats.attendance_rate,
    )
}
