use super::common::{
    CreateStudentRequest, StudentResponse, parse_gender, parse_iso_date, parse_student_status,
};
use crate::response::ApiResponse;
use axum::{Json, extract::State, http::StatusCode};
use common::format_validation_errors;
use db::models::{class, student};
use sea_orm::EntityTrait;
use util::state::AppState;
use validator::Validate;

/// POST /api/students
///
/// Registers a student in a class. Admin only. NISN must be unique across
/// the whole school.
///
/// ### Responses
/// - `201 Created` → `StudentResponse`
/// - `400 Bad Request` — validation failed or malformed gender/status/date
/// - `404 Not Found` — class does not exist
/// - `409 Conflict` — NISN already registered
pub async fn create_student(
    State(state): State<AppState>,
    Json(req): Json<CreateStudentRequest>,
) -> (StatusCode, Json<ApiResponse<StudentResponse>>) {
    let db = state.db();

    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&errors))),
        );
    }

    let gender = match parse_gender(&req.gender) {
        Ok(g) => g,
        Err(msg) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))),
    };
    let status = match req.status.as_deref() {
        Some(raw) => match parse_student_status(raw) {
            Ok(s) => s,
            Err(msg) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))),
        },
        None => student::StudentStatus::Active,
    };
    let birth_date = match parse_iso_date(&req.birth_date, "birthDate") {
        Ok(d) => d,
        Err(msg) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))),
    };

    let class = match class::Entity::find_by_id(req.class_id).one(db).await {
        Ok(Some(c)) => c,
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
                Json(ApiResponse::error("Database error creating student")),
            );
        }
    };

    match student::Model::find_by_nisn(db, &req.nisn).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::error(
                    "A student with this NISN is already registered",
                )),
            );
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "DB error checking NISN");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error creating student")),
            );
        }
    }

    match student::Model::create(
        db,
        &req.nisn,
        &req.name,
        req.class_id,
        gender,
        birth_date,
        &req.guardian_name,
        req.guardian_phone.as_deref(),
        status,
    )
    .await
    {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                StudentResponse::with_class_name(created, Some(class.name)),
                "Student created successfully",
            )),
        ),
        Err(e) => {
            // Unique NISN can still trip under a concurrent insert.
            if e.to_string().contains("UNIQUE constraint failed") {
                return (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::error(
                        "A student with this NISN is already registered",
                    )),
                );
            }
            tracing::error!(error = %e, "DB error creating student");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error creating student")),
            )
        }
    }
}
