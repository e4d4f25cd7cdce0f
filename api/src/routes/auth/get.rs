use crate::auth::Principal;
use crate::response::ApiResponse;
use crate::routes::users::common::UserResponse;
use axum::{Extension, Json, extract::State, http::StatusCode};
use db::models::user;
use sea_orm::EntityTrait;
use util::state::AppState;

/// GET /api/auth/me
///
/// Returns the calling account, including the assigned homeroom class for
/// teachers. The row is re-read so the response reflects the database, not
/// the token.
///
/// ### Responses
/// - `200 OK` → `UserResponse`
/// - `401 Unauthorized` — missing/invalid token
/// - `500 Internal Server Error`
pub async fn me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> (StatusCode, Json<ApiResponse<UserResponse>>) {
    let db = state.db();

    match user::Entity::find_by_id(principal.user_id).one(db).await {
        Ok(Some(account)) => {
            let user = UserResponse::with_class(db, account).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(user, "Current account retrieved")),
            )
        }
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Account no longer exists")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "DB error retrieving current account");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving account")),
            )
        }
    }
}
