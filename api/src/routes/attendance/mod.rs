//! Route group for `/api/attendance`. Both reads and writes are open to any
//! authenticated account, scoped to the caller's class for teachers.

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;

use get::list_attendance;
use post::mark_attendance;

/// Builds the `/attendance` route group.
///
/// - `GET  /attendance` → `list_attendance` (authenticated, class-scoped)
/// - `POST /attendance` → `mark_attendance` (authenticated, class-scoped)
pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attendance))
        .route("/", post(mark_attendance))
}
