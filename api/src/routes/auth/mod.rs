//! Route group for `/api/auth`: credential login and the current-account
//! endpoint.

use crate::auth::guards::allow_authenticated;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use util::state::AppState;

pub mod get;
pub mod post;

use get::me;
use post::login;

/// Builds the `/auth` route group.
///
/// - `POST /auth/login` → `login` (public)
/// - `GET  /auth/me` → `me` (authenticated)
pub fn auth_routes(app_state: AppState) -> Router<AppState> {
    Router::new().route("/login", post(login)).route(
        "/me",
        get(me).route_layer(from_fn_with_state(app_state, allow_authenticated)),
    )
}
