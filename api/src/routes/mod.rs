//! HTTP route entry point for `/api/...`.
//!
//! Routes are organized by domain, each gated by the access control layer
//! it needs:
//! - `/health` → liveness probe (public)
//! - `/auth` → login (public) and current-user lookup (authenticated)
//! - `/users` → account management (admin-only)
//! - `/classes` → class management (reads authenticated, writes admin)
//! - `/students` → student management (reads authenticated and class-scoped,
//!   writes admin)
//! - `/attendance` → daily attendance marking and listing (authenticated,
//!   class-scoped)
//! - `/reports` → daily/summary/export/print reporting (authenticated,
//!   class-scoped)

use crate::auth::guards::{allow_admin, allow_authenticated};
use crate::routes::{
    attendance::attendance_routes, auth::auth_routes, classes::classes_routes,
    health::health_routes, reports::reports_routes, students::students_routes,
    users::users_routes,
};
use axum::{Router, middleware::from_fn_with_state};
use util::state::AppState;

pub mod attendance;
pub mod auth;
pub mod classes;
pub mod health;
pub mod reports;
pub mod students;
pub mod users;

/// Builds the complete application router for all HTTP endpoints.
///
/// The returned router has `AppState` as its state type and mounts all
/// route groups under their base paths. Guard layers run before the group
/// routes; groups that mix admin and non-admin routes add their own inner
/// admin layer on top of the shared authentication layer applied here.
pub fn routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes(app_state.clone()))
        .nest(
            "/users",
            users_routes().route_layer(from_fn_with_state(app_state.clone(), allow_admin)),
        )
        .nest(
            "/classes",
            classes_routes(app_state.clone())
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .nest(
            "/students",
            students_routes(app_state.clone())
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .nest(
            "/attendance",
            attendance_routes()
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .nest(
            "/reports",
            reports_routes()
                .route_layer(from_fn_with_state(app_state, allow_authenticated)),
        )
}
