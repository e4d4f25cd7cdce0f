use super::common::{
    StudentResponse, UpdateStudentRequest, parse_gender, parse_iso_date, parse_student_status,
};
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use common::format_validation_errors;
use db::models::{class, student};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use util::state::AppState;
use validator::Validate;

/// PUT /api/students/{student_id}
///
/// Partial update. Admin only. Omitted fields keep their stored value.
/// Changing `nisn` re-checks uniqueness; changing `classId` re-checks the
/// target class exists (attendance history stays with the student).
///
/// ### Responses
/// - `200 OK` → updated `StudentResponse`
/// - `400 Bad Request` — validation failed or malformed gender/status/date
/// - `404 Not Found` — student or target class missing
/// - `409 Conflict` — NISN belongs to another student
pub async fn update_student(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Json(req): Json<UpdateStudentRequest>,
) -> (StatusCode, Json<ApiResponse<StudentResponse>>) {
    let db = state.db();

    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&errors))),
        );
    }

    let existing = match student::Entity::find_by_id(student_id).one(db).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Student not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, student_id, "DB error loading student");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error updating student")),
            );
        }
    };

    let gender = match req.gender.as_deref() {
        Some(raw) => match parse_gender(raw) {
            Ok(g) => Some(g),
            Err(msg) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))),
        },
        None => None,
    };
    let status = match req.status.as_deref() {
        Some(raw) => match parse_student_status(raw) {
            Ok(s) => Some(s),
            Err(msg) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))),
        },
        None => None,
    };
    let birth_date = match req.birth_date.as_deref() {
        Some(raw) => match parse_iso_date(raw, "birthDate") {
            Ok(d) => Some(d),
            Err(msg) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))),
        },
        None => None,
    };

    if let Some(nisn) = req.nisn.as_deref() {
        if nisn != existing.nisn {
            match student::Model::find_by_nisn(db, nisn).await {
                Ok(Some(other)) if other.id != student_id => {
                    return (
                        StatusCode::CONFLICT,
                        Json(ApiResponse::error(
                            "A student with this NISN is already registered",
                        )),
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, "DB error checking NISN");
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ApiResponse::error("Database error updating student")),
                    );
                }
            }
        }
    }

    if let Some(class_id) = req.class_id {
        if class_id != existing.class_id {
            match class::Entity::find_by_id(class_id).one(db).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    return (
                        StatusCode::NOT_FOUND,
                        Json(ApiResponse::error("Class not found")),
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "DB error checking class");
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ApiResponse::error("Database error updating student")),
                    );
                }
            }
        }
    }

    let mut am = existing.into_active_model();
    if let Some(nisn) = req.nisn {
        am.nisn = Set(nisn);
    }
    if let Some(name) = req.name {
        am.name = Set(name);
    }
    if let Some(class_id) = req.class_id {
        am.class_id = Set(class_id);
    }
    if let Some(gender) = gender {
        am.gender = Set(gender);
    }
    if let Some(birth_date) = birth_date {
        am.birth_date = Set(birth_date);
    }
    if let Some(guardian_name) = req.guardian_name {
        am.guardian_name = Set(guardian_name);
    }
    if let Some(guardian_phone) = req.guardian_phone {
        am.guardian_phone = Set(Some(guardian_phone));
    }
    if let Some(status) = status {
        am.status = Set(status);
    }
    am.updated_at = Set(Utc::now());

    match am.update(db).await {
        Ok(updated) => {
            let class_name = class::Entity::find_by_id(updated.class_id)
                .one(db)
                .await
                .ok()
                .flatten()
                .map(|c| c.name);
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    StudentResponse::with_class_name(updated, class_name),
                    "Student updated successfully",
                )),
            )
        }
        Err(e) => {
            if e.to_string().contains("UNIQUE constraint failed") {
                return (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::error(
                        "A student with this NISN is already registered",
                    )),
                );
            }
            tracing::error!(error = %e, student_id, "DB error updating student");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error updating student")),
            )
        }
    }
}
