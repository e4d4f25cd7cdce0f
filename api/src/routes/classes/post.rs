use super::common::{ClassResponse, CreateClassRequest};
use crate::response::ApiResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use common::format_validation_errors;
use db::models::{
    class,
    user::{self, Role},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use util::state::AppState;
use validator::Validate;

/// POST /api/classes
///
/// Creates a class, optionally assigning a homeroom teacher. Admin only.
///
/// ### Request Body
/// ```json
/// { "name": "1A", "grade": 1, "teacherId": 3 }
/// ```
///
/// ### Responses
/// - `201 Created` → `ClassResponse`
/// - `400 Bad Request` — validation failure or `teacherId` is not a teacher
/// - `404 Not Found` — `teacherId` does not exist
/// - `409 Conflict` — duplicate class name, or the teacher already has a
///   class
pub async fn create_class(
    State(state): State<AppState>,
    Json(req): Json<CreateClassRequest>,
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

    match class::Entity::find()
        .filter(class::Column::Name.eq(req.name.as_str()))
        .one(db)
        .await
    {
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
                    "Database error creating class",
                )),
            )
                .into_response();
        }
    }

    let teacher = match req.teacher_id {
        Some(teacher_id) => match user::Entity::find_by_id(teacher_id).one(db).await {
            Ok(Some(u)) if u.role == Role::Teacher => {
                let already = class::Model::find_by_teacher(db, u.id).await.ok().flatten();
                if already.is_some() {
                    return (
                        StatusCode::CONFLICT,
                        Json(ApiResponse::<ClassResponse>::error(
                            "This teacher already has a homeroom class",
                        )),
                    )
                        .into_response();
                }
                Some(u)
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
                        "Database error creating class",
                    )),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let now = Utc::now();
    let created = class::ActiveModel {
        name: Set(req.name),
        grade: Set(req.grade),
        teacher_id: Set(teacher.as_ref().map(|t| t.id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await;

    match created {
        Ok(c) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                ClassResponse::from_with_details(c, teacher.map(|t| t.name), 0),
                "Class created successfully",
            )),
        )
            .into_response(),
        Err(e) => {
            if e.to_string().contains("UNIQUE constraint failed") {
                return (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::<ClassResponse>::error(
                        "A class with this name already exists",
                    )),
                )
                    .into_response();
            }
            tracing::error!(error = %e, "DB error creating class");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ClassResponse>::error(
                    "Database error creating class",
                )),
            )
                .into_response()
        }
    }
}
