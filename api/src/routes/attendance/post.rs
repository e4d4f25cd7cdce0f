use super::common::{
    AttendanceRecordResponse, MarkAttendanceRequest, parse_check_in_time, parse_date, parse_status,
};
use crate::auth::guards::Principal;
use crate::response::ApiResponse;
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use db::models::{attendance_record, class, student};
use sea_orm::EntityTrait;
use util::state::AppState;

/// POST /api/attendance
///
/// Marks a student's attendance for a day. Writing the same (student, date)
/// again overwrites the earlier status, so corrections are plain re-posts.
/// Teachers may only mark students of their own class.
///
/// ### Responses
/// - `201 Created` — first record for this student and date
/// - `200 OK` — an existing record was overwritten
/// - `400 Bad Request` — malformed status, date or checkInTime
/// - `403 Forbidden` — student belongs to another class
/// - `404 Not Found` — student does not exist
pub async fn mark_attendance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<MarkAttendanceRequest>,
) -> (StatusCode, Json<ApiResponse<AttendanceRecordResponse>>) {
    let db = state.db();

    let status = match parse_status(&req.status) {
        Ok(s) => s,
        Err(msg) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))),
    };
    let date = match req.date.as_deref() {
        Some(raw) => match parse_date(raw, "date") {
            Ok(d) => d,
            Err(msg) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))),
        },
        None => Utc::now().date_naive(),
    };
    let check_in_time = match req.check_in_time.as_deref() {
        Some(raw) => match parse_check_in_time(raw) {
            Ok(t) => Some(t),
            Err(msg) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))),
        },
        None => None,
    };

    let student = match student::Entity::find_by_id(req.student_id).one(db).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Student not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, student_id = req.student_id, "DB error loading student");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error recording attendance")),
            );
        }
    };

    if !principal.may_manage_class(student.class_id) {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("You may only access your own class")),
        );
    }

    let notes = req.notes.or(req.reason);

    match attendance_record::Model::upsert(db, student.id, date, status, check_in_time, notes).await
    {
        Ok((record, created)) => {
            let class = class::Entity::find_by_id(student.class_id)
                .one(db)
                .await
                .ok()
                .flatten();
            let body = AttendanceRecordResponse::build(record, Some(&student), class.as_ref());
            if created {
                (
                    StatusCode::CREATED,
                    Json(ApiResponse::success(body, "Attendance recorded")),
                )
            } else {
                (
                    StatusCode::OK,
                    Json(ApiResponse::success(body, "Attendance updated")),
                )
            }
        }
        Err(e) => {
            tracing::error!(error = %e, student_id = student.id, "DB error upserting attendance");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error recording attendance")),
            )
        }
    }
}
