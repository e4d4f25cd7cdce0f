use super::common::{ClassResponse, UpdateClassRequest};
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use common::format_validation_errors;
use db::models::{
    class,
    user::{self, Role},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
};
use util::state::AppState;
use validator::Validate;

/// PUT /api/classes/{class_id}
///
/// Partially updates a class. Admin only. `teacherId: null` unassigns the
/// homeroom teacher; an absent `teacherId` leaves it unchanged.
///
/// ### Responses
/// - `200 OK` → updated `ClassResponse`
/// - `400 Bad Request` — validation failure or `teacherId` is not a teacher
/// - `404 Not Found` — class or teacher missing
/// - `409 Conflict` — duplicate class name, or the teacher already has a
///   different class
pub async fn update_class(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
    Json(req): Json<UpdateClassRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ClassResponse>::error(
                format_validation_errors(&validation_errors),
            )),
        )
            .into_response();
    }

    let db = state.db();

    let existing = match class::Entity::find_by_id(class_id).one(db).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<ClassResponse>::error("Class not found")),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, class_id, "DB error loading class");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ClassResponse>::error(
                    "Database error updating class",
                )),
            )
                .into_response();
        }
    };

    if let Some(ref name) = req.name {
        let taken = class::Entity::find()
            .filter(class::Column::Name.eq(name.as_str()))
            .filter(class::Column::Id.ne(class_id))
            .one(db)
            .await;
        match taken {
            Ok(Some(_)) => {
                return (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::<ClassResponse>::error(
                        "A class with this name already exists",
                    )),
                )
                    .into_response();
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "DB error checking class name");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<ClassResponse>::error(
                        "Database error updating class",
                    )),
                )
                    .into_response();
            }
        }
    }

    // Resolve the new teacher pointer before touching the row.
    let new_teacher = match req.teacher_id {
        None => None,
        Some(None) => Some(None),
        Some(Some(teacher_id)) => match user::Entity::find_by_id(teacher_id).one(db).await {
            Ok(Some(u)) if u.role == Role::Teacher => {
                let elsewhere = class::Model::find_by_teacher(db, u.id)
                    .await
                    .ok()
                    .flatten()
                    .filter(|c| c.id != class_id);
                if elsewhere.is_some() {
                    return (
                        StatusCode::CONFLICT,
                        Json(ApiResponse::<ClassResponse>::error(
                            "This teacher already has a homeroom class",
                        )),
                    )
                        .into_response();
                }
                Some(Some(u.id))
            }
            Ok(Some(_)) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<ClassResponse>::error(
                        "Assigned user is not a teacher",
                    )),
                )
                    .into_response();
            }
            Ok(None) => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::<ClassResponse>::error("Teacher not found")),
                )
                    .into_response();
            }
            Err(e) => {
                tracing::error!(error = %e, "DB error checking teacher");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<ClassResponse>::error(
                        "Database error updating class",
                    )),
                )
                    .into_response();
            }
        },
    };

    let mut am = existing.into_active_model();
    if let Some(name) = req.name {
        am.name = Set(name);
    }
    if let Some(grade) = req.grade {
        am.grade = Set(grade);
    }
    if let Some(pointer) = new_teacher {
        am.teacher_id = Set(pointer);
    }
    am.updated_at = Set(Utc::now());

    match am.update(db).await {
        Ok(c) => {
            let count = class::Model::student_count(db, c.id).await.unwrap_or(0);
            let teacher_name = match c.teacher_id {
                Some(t) => user::Entity::find_by_id(t)
                    .one(db)
                    .await
                    .ok()
                    .flatten()
                    .map(|u| u.name),
                None => None,
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    ClassResponse::from_with_details(c, teacher_name, count),
                    "Class updated successfully",
                )),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, class_id, "DB error updating class");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ClassResponse>::error(
                    "Database error updating class",
                )),
            )
                .into_response()
        }
    }
}
