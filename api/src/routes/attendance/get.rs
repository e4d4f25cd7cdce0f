use super::common::{AttendanceRecordResponse, ListQuery, ListResponse, parse_date};
use crate::auth::guards::{ClassScope, Principal};
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::{attendance_record, class, student};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::collections::HashMap;
use util::state::AppState;

/// GET /api/attendance
///
/// Lists attendance records with optional filters, newest date first.
/// Teachers only see their own class regardless of filters.
///
/// **Query**:
/// - `date` *(optional)* — a single day, `YYYY-MM-DD`
/// - `startDate` + `endDate` *(optional)* — inclusive range; both or neither
/// - `classId` *(optional)* — teachers may only name their own class
/// - `studentId` *(optional)*
pub async fn list_attendance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(q): Query<ListQuery>,
) -> impl IntoResponse {
    let db = state.db();

    let bad_request = |msg: String| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ListResponse>::error(msg)),
        )
            .into_response()
    };

    // A single date wins over a range; a half-open range is rejected.
    let date_filter = if let Some(raw) = q.date.as_deref() {
        match parse_date(raw, "date") {
            Ok(d) => Some((d, d)),
            Err(msg) => return bad_request(msg),
        }
    } else {
        match (q.start_date.as_deref(), q.end_date.as_deref()) {
            (Some(start_raw), Some(end_raw)) => {
                let start = match parse_date(start_raw, "startDate") {
                    Ok(d) => d,
                    Err(msg) => return bad_request(msg),
                };
                let end = match parse_date(end_raw, "endDate") {
                    Ok(d) => d,
                    Err(msg) => return bad_request(msg),
                };
                if start > end {
                    return bad_request("startDate must not be after endDate".to_string());
                }
                Some((start, end))
            }
            (None, None) => None,
            _ => {
                return bad_request(
                    "startDate and endDate must be provided together".to_string(),
                );
            }
        }
    };

    let scope = match principal.scope_class(q.class_id) {
        Ok(s) => s,
        Err(denied) => return denied.into_response(),
    };

    let empty = || {
        (
            StatusCode::OK,
            Json(ApiResponse::success(
                ListResponse {
                    attendance_records: Vec::new(),
                },
                "Attendance records retrieved",
            )),
        )
            .into_response()
    };

    let mut sel = attendance_record::Entity::find();
    match scope {
        ClassScope::All => {}
        ClassScope::Class(class_id) => {
            let roster_ids: Vec<i64> = match student::Model::roster(db, class_id).await {
                Ok(roster) => roster.iter().map(|s| s.id).collect(),
                Err(e) => {
                    tracing::error!(error = %e, class_id, "DB error loading roster");
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ApiResponse::<ListResponse>::error(
                            "Database error listing attendance",
                        )),
                    )
                        .into_response();
                }
            };
            if roster_ids.is_empty() {
                return empty();
            }
            sel = sel.filter(attendance_record::Column::StudentId.is_in(roster_ids));
        }
        ClassScope::Nothing => return empty(),
    }

    if let Some((start, end)) = date_filter {
        sel = sel.filter(attendance_record::Column::Date.between(start, end));
    }
    if let Some(student_id) = q.student_id {
        sel = sel.filter(attendance_record::Column::StudentId.eq(student_id));
    }

    let records = match sel.all(db).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "DB error listing attendance");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ListResponse>::error(
                    "Database error listing attendance",
                )),
            )
                .into_response();
        }
    };

    let student_ids: Vec<i64> = records.iter().map(|r| r.student_id).collect();
    let mut students: HashMap<i64, student::Model> = HashMap::new();
    if !student_ids.is_empty() {
        let rows = student::Entity::find()
            .filter(student::Column::Id.is_in(student_ids))
            .all(db)
            .await
            .unwrap_or_default();
        for s in rows {
            students.insert(s.id, s);
        }
    }

    let class_ids: Vec<i64> = students.values().map(|s| s.class_id).collect();
    let mut classes: HashMap<i64, class::Model> = HashMap::new();
    if !class_ids.is_empty() {
        let rows = class::Entity::find()
            .filter(class::Column::Id.is_in(class_ids))
            .all(db)
            .await
            .unwrap_or_default();
        for c in rows {
            classes.insert(c.id, c);
        }
    }

    // Date desc, then class name, then student name. Names live in the maps,
    // so the ordering happens here rather than in SQL.
    let mut rows: Vec<AttendanceRecordResponse> = records
        .into_iter()
        .map(|record| {
            let student = students.get(&record.student_id);
            let class = student.and_then(|s| classes.get(&s.class_id));
            AttendanceRecordResponse::build(record, student, class)
        })
        .collect();
    rows.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.class_name.cmp(&b.class_name))
            .then_with(|| a.student_name.cmp(&b.student_name))
    });

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            ListResponse {
                attendance_records: rows,
            },
            "Attendance records retrieved",
        )),
    )
        .into_response()
}
