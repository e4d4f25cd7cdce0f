//! Route group for `/api/students`. Reads are scoped to the caller's class
//! for teachers; mutations are admin-only via a nested guard layer.

use crate::auth::guards::allow_admin;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use delete::delete_student;
use get::{get_student, list_students};
use post::create_student;
use put::update_student;

/// Builds the `/students` route group.
///
/// - `GET    /students` → `list_students` (authenticated, class-scoped)
/// - `GET    /students/{student_id}` → `get_student` (authenticated, class-scoped)
/// - `POST   /students` → `create_student` (admin)
/// - `PUT    /students/{student_id}` → `update_student` (admin)
/// - `DELETE /students/{student_id}` → `delete_student` (admin)
pub fn students_routes(app_state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/", post(create_student))
        .route("/{student_id}", put(update_student))
        .route("/{student_id}", delete(delete_student))
        .route_layer(from_fn_with_state(app_state, allow_admin));

    Router::new()
        .route("/", get(list_students))
        .route("/{student_id}", get(get_student))
        .merge(admin_routes)
}
