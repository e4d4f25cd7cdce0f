use super::common::{UpdateUserRequest, UserResponse};
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
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use util::state::AppState;
use validator::Validate;

/// PUT /api/users/{user_id}
///
/// Partially updates an account; absent fields stay untouched. Admin only.
/// `classId` reassigns a teacher's homeroom class.
///
/// ### Responses
/// - `200 OK` → updated `UserResponse`
/// - `400 Bad Request` — validation failure, unknown role, or `classId` on
///   an admin account
/// - `404 Not Found` — user or target class missing
/// - `409 Conflict` — email already taken by another account
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
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

    let role = match req.role.as_deref() {
        Some(raw) => match raw.parse::<Role>() {
            Ok(r) => Some(r),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<UserResponse>::error(
                        "Invalid role: must be ADMIN or TEACHER",
                    )),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let db = state.db();

    let account = match user::Entity::find_by_id(user_id).one(db).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<UserResponse>::error("User not found")),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, user_id, "DB error loading user");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<UserResponse>::error(
                    "Database error updating user",
                )),
            )
                .into_response();
        }
    };

    let effective_role = role.clone().unwrap_or_else(|| account.role.clone());
    if req.class_id.is_some() && effective_role != Role::Teacher {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<UserResponse>::error(
                "Only teachers can be assigned a class",
            )),
        )
            .into_response();
    }

    if let Some(ref email) = req.email {
        let taken = user::Entity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .filter(user::Column::Id.ne(user_id))
            .one(db)
            .await;
        match taken {
            Ok(Some(_)) => {
                return (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::<UserResponse>::error(
                        "A user with this email already exists",
                    )),
                )
                    .into_response();
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "DB error checking email");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<UserResponse>::error(
                        "Database error updating user",
                    )),
                )
                    .into_response();
            }
        }
    }

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
                        "Database error updating user",
                    )),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let mut am = account.into_active_model();
    if let Some(email) = req.email {
        am.email = Set(email);
    }
    if let Some(password) = req.password {
        match user::Model::hash_password(&password) {
            Ok(hash) => am.password_hash = Set(hash),
            Err(e) => {
                tracing::error!(error = %e, "Password hashing failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<UserResponse>::error(
                        "Database error updating user",
                    )),
                )
                    .into_response();
            }
        }
    }
    if let Some(name) = req.name {
        am.name = Set(name);
    }
    if let Some(role) = role {
        am.role = Set(role);
    }
    if let Some(nip) = req.nip {
        am.nip = Set(Some(nip));
    }
    if let Some(phone) = req.phone {
        am.phone = Set(Some(phone));
    }
    am.updated_at = Set(Utc::now());

    let updated = match am.update(db).await {
        Ok(u) => u,
        Err(e) => {
            tracing::error!(error = %e, user_id, "DB error updating user");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<UserResponse>::error(
                    "Database error updating user",
                )),
            )
                .into_response();
        }
    };

    // Reassign the homeroom class: release the old pointer first so the
    // unique teacher_id constraint cannot trip.
    if let Some(c) = target_class.as_ref() {
        let previous = class::Model::find_by_teacher(db, updated.id)
            .await
            .ok()
            .flatten();
        if previous.as_ref().map(|p| p.id) != Some(c.id) {
            if let Some(prev) = previous {
                let mut pm = prev.into_active_model();
                pm.teacher_id = Set(None);
                pm.updated_at = Set(Utc::now());
                if let Err(e) = pm.update(db).await {
                    tracing::error!(error = %e, "Failed to release previous class");
                }
            }
            let mut cm = c.clone().into_active_model();
            cm.teacher_id = Set(Some(updated.id));
            cm.updated_at = Set(Utc::now());
            if let Err(e) = cm.update(db).await {
                tracing::error!(error = %e, user_id = updated.id, "Failed to assign homeroom class");
            }
        }
    }

    let user = UserResponse::with_class(db, updated).await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(user, "User updated successfully")),
    )
        .into_response()
}
