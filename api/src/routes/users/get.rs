use super::common::UserResponse;
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::{class, user};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;
use util::state::AppState;

/// GET /api/users
///
/// Lists all accounts ordered by display name, each with its homeroom class
/// when one is assigned. Admin only. The set is small (school staff), so
/// there is no pagination.
pub async fn list_users(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<UserResponse>>>) {
    let db = state.db();

    let accounts = match user::Entity::find()
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "DB error listing users");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error listing users")),
            );
        }
    };

    let assigned = class::Entity::find()
        .filter(class::Column::TeacherId.is_not_null())
        .all(db)
        .await
        .unwrap_or_default();
    let by_teacher: HashMap<i64, class::Model> = assigned
        .into_iter()
        .filter_map(|c| c.teacher_id.map(|t| (t, c)))
        .collect();

    let users = accounts
        .into_iter()
        .map(|u| {
            let class = by_teacher.get(&u.id);
            UserResponse::with_class_info(u, class)
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(users, "Users retrieved")),
    )
}

/// GET /api/users/{user_id}
///
/// Fetch a single account by id. Admin only.
///
/// ### Responses
/// - `200 OK` → `UserResponse`
/// - `404 Not Found`
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<UserResponse>>) {
    let db = state.db();

    match user::Entity::find_by_id(user_id).one(db).await {
        Ok(Some(account)) => {
            let user = UserResponse::with_class(db, account).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(user, "User retrieved")),
            )
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, user_id, "DB error retrieving user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving user")),
            )
        }
    }
}
