use super::common::ClassUsage;
use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::class;
use sea_orm::{EntityTrait, ModelTrait};
use util::state::AppState;

/// DELETE /api/classes/{class_id}
///
/// Deletes an empty class. Admin only. A class that still has students or
/// whose students have attendance records is protected; the 409 carries the
/// counts so the client can show what is blocking.
///
/// ### Responses
/// - `200 OK` — class deleted
/// - `404 Not Found`
/// - `409 Conflict` → `data: { "studentCount": n, "attendanceCount": m }`
pub async fn delete_class(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
) -> impl IntoResponse {
    let db = state.db();

    let existing = match class::Entity::find_by_id(class_id).one(db).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error("Class not found")),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, class_id, "DB error loading class");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error deleting class")),
            )
                .into_response();
        }
    };

    let usage = match usage_of(db, class_id).await {
        Ok(u) => u,
        Err(e) => {
            tracing::error!(error = %e, class_id, "DB error counting class usage");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error deleting class")),
            )
                .into_response();
        }
    };

    if usage.student_count > 0 || usage.attendance_count > 0 {
        return (
            StatusCode::CONFLICT,
            Json(ApiResponse::error_with_data(
                usage,
                "Class still has students or attendance records",
            )),
        )
            .into_response();
    }

    match existing.delete(db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::<Empty>::success(
                Empty,
                "Class deleted successfully",
            )),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, class_id, "DB error deleting class");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error deleting class")),
            )
                .into_response()
        }
    }
}

async fn usage_of(
    db: &sea_orm::DatabaseConnection,
    class_id: i64,
) -> Result<ClassUsage, sea_orm::DbErr> {
    Ok(ClassUsage {
        student_count: class::Model::student_count(db, class_id).await?,
        attendance_count: class::Model::attendance_count(db, class_id).await?,
    })
}
