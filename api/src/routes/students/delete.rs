use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::student;
use sea_orm::{EntityTrait, ModelTrait};
use util::state::AppState;

/// DELETE /api/students/{student_id}
///
/// Removes a student together with their attendance records. Admin only.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`
pub async fn delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    let db = state.db();

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
                Json(ApiResponse::error("Database error deleting student")),
            );
        }
    };

    // Attendance rows go with the student via ON DELETE CASCADE.
    match existing.delete(db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Empty,
                "Student and their attendance records deleted",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, student_id, "DB error deleting student");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error deleting student")),
            )
        }
    }
}
