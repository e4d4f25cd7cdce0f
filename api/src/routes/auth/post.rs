use crate::auth::generate_jwt;
use crate::response::ApiResponse;
use crate::routes::users::common::UserResponse;
use axum::{Json, extract::State, http::StatusCode};
use common::format_validation_errors;
use db::models::user;
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: UserResponse,
}

/// POST /api/auth/login
///
/// Verifies a username/password pair and hands out a JWT.
///
/// ### Request Body
/// ```json
/// { "username": "admin", "password": "secret" }
/// ```
///
/// ### Responses
/// - `200 OK` → `{ token, expiresAt, user }`
/// - `400 Bad Request` — validation failure
/// - `401 Unauthorized` — unknown username or wrong password (same message
///   for both, so the endpoint does not leak which accounts exist)
/// - `500 Internal Server Error`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> (StatusCode, Json<ApiResponse<LoginResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    let db = state.db();

    let account = match user::Model::find_by_username(db, &req.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Invalid username or password")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "DB error during login");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error during login")),
            );
        }
    };

    if !account.verify_password(&req.password) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid username or password")),
        );
    }

    let (token, expires_at) = generate_jwt(account.id, account.is_admin());
    let user = UserResponse::with_class(db, account).await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            LoginResponse {
                token,
                expires_at,
                user,
            },
            "Login successful",
        )),
    )
}
