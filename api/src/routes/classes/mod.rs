//! Route group for `/api/classes`. Reads are open to any authenticated
//! account; mutations are admin-only via a nested guard layer.

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

use delete::delete_class;
use get::{get_class, list_classes};
use post::create_class;
use put::update_class;

/// Builds the `/classes` route group.
///
/// - `GET    /classes` → `list_classes` (authenticated)
/// - `GET    /classes/{class_id}` → `get_class` (authenticated)
/// - `POST   /classes` → `create_class` (admin)
/// - `PUT    /classes/{class_id}` → `update_class` (admin)
/// - `DELETE /classes/{class_id}` → `delete_class` (admin)
pub fn classes_routes(app_state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/", post(create_class))
        .route("/{class_id}", put(update_class))
        .route("/{class_id}", delete(delete_class))
        .route_layer(from_fn_with_state(app_state, allow_admin));

    Router::new()
        .route("/", get(list_classes))
        .route("/{class_id}", get(get_class))
        .merge(admin_routes)
}
