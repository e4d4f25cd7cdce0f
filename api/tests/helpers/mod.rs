#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use chrono::Utc;
use db::models::{attendance_record, class, student, user};
use sea_orm::prelude::{Date, Time};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;
use std::sync::Once;
use util::state::AppState;

static ENV_INIT: Once = Once::new();

/// Provides the required configuration env vars when no `.env` is present,
/// so test binaries are self-contained. Runs once per process, before any
/// config access.
pub fn ensure_test_env() {
    ENV_INIT.call_once(|| {
        for (key, value) in [
            ("JWT_SECRET", "test-secret"),
            ("JWT_DURATION_MINUTES", "60"),
            ("DATABASE_PATH", "data/test.db"),
        ] {
            if std::env::var(key).is_err() {
                unsafe { std::env::set_var(key, value) };
            }
        }
    });
}

/// Builds the full application router over a fresh in-memory database.
pub async fn make_app() -> (Router, AppState) {
    ensure_test_env();
    let db = db::test_utils::setup_test_db().await;
    let state = AppState::new(db);
    let app = Router::new()
        .nest("/api", api::routes::routes(state.clone()))
        .with_state(state.clone());
    (app, state)
}

pub async fn seed_admin(db: &DatabaseConnection) -> user::Model {
    user::Model::create(
        db,
        "admin",
        "admin@sekolah.sch.id",
        "password123",
        "Administrator",
        user::Role::Admin,
        None,
        None,
    )
    .await
    .expect("Failed to create admin")
}

pub async fn seed_teacher(db: &DatabaseConnection, username: &str) -> user::Model {
    user::Model::create(
        db,
        username,
        &format!("{username}@sekolah.sch.id"),
        "password123",
        &format!("Guru {username}"),
        user::Role::Teacher,
        Some("198501012010012001"),
        None,
    )
    .await
    .expect("Failed to create teacher")
}

pub async fn seed_class(
    db: &DatabaseConnection,
    name: &str,
    grade: i32,
    teacher_id: Option<i64>,
) -> class::Model {
    let now = Utc::now();
    class::ActiveModel {
        name: Set(name.to_string()),
        grade: Set(grade),
        teacher_id: Set(teacher_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create class")
}

pub async fn seed_student(
    db: &DatabaseConnection,
    nisn: &str,
    name: &str,
    class_id: i64,
) -> student::Model {
    student::Model::create(
        db,
        nisn,
        name,
        class_id,
        student::Gender::L,
        Date::from_ymd_opt(2013, 1, 15).unwrap(),
        "Wali Murid",
        None,
        student::StudentStatus::Active,
    )
    .await
    .expect("Failed to create student")
}

pub async fn seed_record(
    db: &DatabaseConnection,
    student_id: i64,
    date: Date,
    status: attendance_record::AttendanceStatus,
    check_in: Option<Time>,
) -> attendance_record::Model {
    let (record, _) = attendance_record::Model::upsert(db, student_id, date, status, check_in, None)
        .await
        .expect("Failed to upsert attendance record");
    record
}

pub fn token_for(u: &user::Model) -> String {
    let (token, _) = api::auth::generate_jwt(u.id, u.role == user::Role::Admin);
    token
}

pub fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn get_public(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_json_public(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn put_json(uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn delete_req(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn read_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
