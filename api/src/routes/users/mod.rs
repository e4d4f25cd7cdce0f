//! Route group for `/api/users`: account management. Every route here is
//! admin-only; the guard is applied where the group is nested. Accounts are
//! never deleted, only updated, so attendance history keeps its author.

use axum::{
    Router,
    routing::{get, post, put},
};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;
pub mod put;

use get::{get_user, list_users};
use post::create_user;
use put::update_user;

/// Builds the `/users` route group.
///
/// - `GET  /users` → `list_users`
/// - `POST /users` → `create_user`
/// - `GET  /users/{user_id}` → `get_user`
/// - `PUT  /users/{user_id}` → `update_user`
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/{user_id}", get(get_user))
        .route("/{user_id}", put(update_user))
}
