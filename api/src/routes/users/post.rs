use super::common::{CreateUserRequest, UserResponse};
use crate::response::ApiResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use common::format_validation_errors;
use db::models::{
    class,
    user::{self, Role},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, QueryFilter, Set,
};
use util::state::AppState;
use validator::Validate;

/// POST /api/users
///
/// Creates an account. Admin only. A `classId` may be given for teachers to
/// assign their homeroom class in the same call.
///
/// ### Request Body
/// ```json
/// {
///   "username": "bu.siti",
///   "email": "siti@sekolah.sch.id",
///   "password": "rahasia-besar",
///   "name": "Siti Rahayu",
///   "role": "TEACHER",
///   "nip": "196706142007012015",
///   "classId": 3
/// }
/// ```
///
/// ### Responses
/// - `201 Created` → `UserResponse`
/// - `400 Bad Request` — validation failure, unknown role, or `classId` on
///   an admin account
/// - `404 Not Found` — `classId` does not exist
/// - `409 Conflict` — duplicate username or email
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<UserResponse>::error(format_validation_errors(
                &validation_errors,
            ))),
        )
            .into_response();
    }

    let role = match req.role.parse::<Role>() {
        Ok(r) => r,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<UserResponse>::error(
                    "Invalid role: must be ADMIN or TEACHER",
                )),
            )
                .into_response();
        }
    };

    if req.class_id.is_some() && role != Role::Teacher {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<UserResponse>::error(
                "Only teachers can be assigned a class",
            )),
        )
            .into_response();
    }

    let db = state.db();

    // The class must exist before the account is created, so a bad classId
    // does not leave a half-configured teacher behind.
    let target_class = match req.class_id {
        Some(class_id) => match class::Entity::find_by_id(class_id).one(db).await {
            Ok(Some(c)) => Some(c),
            Ok(None) => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::<UserResponse>::error("Class not found")),
                )
                    .into_response();
            }
            Err(e) => {
                tracing::error!(error = %e, "DB error checking class");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<UserResponse>::error(
                        "Database error creating user",
                    )),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let duplicate = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(req.username.as_str()))
                .add(user::Column::Email.eq(req.email.as_str())),
        )
        .one(db)
        .await;
    match duplicate {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::<UserResponse>::error(
                    "A user with this username or email already exists",
                )),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "DB error checking duplicates");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<UserResponse>::error(
                    "Database error creating user",
                )),
            )
                .into_response();
        }
    }

    let account = match user::Model::create(
        db,
        &req.username,
        &req.email,
        &req.password,
        &req.name,
        role,
        req.nip.as_deref(),
        req.phone.as_deref(),
    )
    .await
    {
        Ok(u) => u,
        Err(e) => {
            // The pre-check races with concurrent creates; the constraint
            // is the authority.
            if e.to_string().contains("UNIQUE constraint failed") {
                return (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::<UserResponse>::error(
                        "A user with this username or email already exists",
                    )),
                )
                    .into_response();
            }
            tracing::error!(error = %e, "DB error creating user");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<UserResponse>::error(
                    "Database error creating user",
                )),
            )
                .into_response();
        }
    };

    let assigned = match target_class {
        Some(c) => {
            let mut am = c.into_active_model();
            am.teacher_id = Set(Some(account.id));
            am.updated_at = Set(Utc::now());
            match am.update(db).await {
                Ok(updated) => Some(updated),
                Err(e) => {
                    tracing::error!(error = %e, user_id = account.id, "Failed to assign homeroom class");
                    None
                }
            }
        }
        None => None,
    };

    (
        StatusCode::CREATED,
        Json(ApiResponse::success(
            UserResponse::with_class_info(account, assigned.as_ref()),
            "User created successfully",
        )),
    )
        .into_response()
}
