mod helpers;

use axum::http::StatusCode;
use chrono::NaiveDate;
use db::models::attendance_record::AttendanceStatus;
use helpers::{
    delete_req, get, make_app, post_json, put_json, read_json, seed_admin, seed_class, seed_record,
    seed_student, seed_teacher, token_for,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn create_class_with_teacher() {
    let (app, state) = make_app().await;
    let admin = seed_admin(state.db()).await;
    let teacher = seed_teacher(state.db(), "guru.satu").await;

    let res = app
        .oneshot(post_json(
            "/api/classes",
            &token_for(&admin),
            &json!({ "name": "1A", "grade": 1, "teacherId": teacher.id }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = read_json(res).await;
    assert_eq!(body["data"]["name"], "1A");
    assert_eq!(body["data"]["grade"], 1);
    assert_eq!(body["data"]["teacherId"], teacher.id);
    assert_eq!(body["data"]["teacherName"], teacher.name);
    assert_eq!(body["data"]["studentCount"], 0);
}

#[tokio::test]
async fn create_class_conflicts_and_validation() {
    let (app, state) = make_app().await;
    let admin = seed_admin(state.db()).await;
    let teacher = seed_teacher(state.db(), "guru.satu").await;
    seed_class(state.db(), "1A", 1, Some(teacher.id)).await;
    let token = token_for(&admin);

    let duplicate_name = app
        .clone()
        .oneshot(post_json(
            "/api/classes",
            &token,
            &json!({ "name": "1A", "grade": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(duplicate_name.status(), StatusCode::CONFLICT);

    // This teacher already runs 1A.
    let busy_teacher = app
        .clone()
        .oneshot(post_json(
            "/api/classes",
            &token,
            &json!({ "name": "1B", "grade": 1, "teacherId": teacher.id }),
        ))
        .await
        .unwrap();
    assert_eq!(busy_teacher.status(), StatusCode::CONFLICT);

    let not_a_teacher = app
        .clone()
        .oneshot(post_json(
            "/api/classes",
            &token,
            &json!({ "name": "1B", "grade": 1, "teacherId": admin.id }),
        ))
        .await
        .unwrap();
    assert_eq!(not_a_teacher.status(), StatusCode::BAD_REQUEST);

    let unknown_teacher = app
        .clone()
        .oneshot(post_json(
            "/api/classes",
            &token,
            &json!({ "name": "1B", "grade": 1, "teacherId": 9999 }),
        ))
        .await
        .unwrap();
    assert_eq!(unknown_teacher.status(), StatusCode::NOT_FOUND);

    let bad_grade = app
        .oneshot(post_json(
            "/api/classes",
            &token,
            &json!({ "name": "13X", "grade": 13 }),
        ))
        .await
        .unwrap();
    assert_eq!(bad_grade.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn class_mutations_are_admin_only() {
    let (app, state) = make_app().await;
    let teacher = seed_teacher(state.db(), "guru.satu").await;
    seed_class(state.db(), "1A", 1, Some(teacher.id)).await;
    let token = token_for(&teacher);

    let create = app
        .clone()
        .oneshot(post_json(
            "/api/classes",
            &token,
            &json!({ "name": "9Z", "grade": 9 }),
        ))
        .await
        .unwrap();
    assert_eq!(create.status(), StatusCode::FORBIDDEN);

    // Reads stay open to any authenticated account.
    let list = app.oneshot(get("/api/classes", &token)).await.unwrap();
    assert_eq!(list.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_classes_reports_derived_student_count() {
    let (app, state) = make_app().await;
    let admin = seed_admin(state.db()).await;
    let kelas = seed_class(state.db(), "1A", 1, None).await;
    let other = seed_class(state.db(), "1B", 1, None).await;
    seed_student(state.db(), "0000000001", "Ani Wijaya", kelas.id).await;
    seed_student(state.db(), "0000000002", "Budi Santoso", kelas.id).await;
    seed_student(state.db(), "0000000003", "Citra Lestari", other.id).await;

    let res = app
        .oneshot(get("/api/classes", &token_for(&admin)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = read_json(res).await;
    let classes = body["data"].as_array().unwrap();
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0]["name"], "1A");
    assert_eq!(classes[0]["studentCount"], 2);
    assert_eq!(classes[1]["name"], "1B");
    assert_eq!(classes[1]["studentCount"], 1);
}

#[tokio::test]
async fn update_class_teacher_id_distinguishes_absent_from_null() {
    let (app, state) = make_app().await;
    let admin = seed_admin(state.db()).await;
    let teacher = seed_teacher(state.db(), "guru.satu").await;
    let kelas = seed_class(state.db(), "1A", 1, Some(teacher.id)).await;
    let token = token_for(&admin);
    let uri = format!("/api/classes/{}", kelas.id);

    // Field absent: assignment untouched.
    let res = app
        .clone()
        .oneshot(put_json(&uri, &token, &json!({ "name": "1A Baru" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["data"]["name"], "1A Baru");
    assert_eq!(body["data"]["teacherId"], teacher.id);

    // Field null: teacher unassigned.
    let res = app
        .oneshot(put_json(&uri, &token, &json!({ "teacherId": null })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert!(body["data"]["teacherId"].is_null());
}

#[tokio::test]
async fn delete_class_blocked_while_in_use() {
    let (app, state) = make_app().await;
    let admin = seed_admin(state.db()).await;
    let kelas = seed_class(state.db(), "1A", 1, None).await;
    let siswa = seed_student(state.db(), "0000000001", "Ani Wijaya", kelas.id).await;
    seed_record(
        state.db(),
        siswa.id,
        NaiveDate::from_ymd_opt(2025, 7, 21).unwrap(),
        AttendanceStatus::Hadir,
        None,
    )
    .await;
    let token = token_for(&admin);
    let uri = format!("/api/classes/{}", kelas.id);

    let res = app.clone().oneshot(delete_req(&uri, &token)).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // The conflict body carries the usage counts so the client can explain.
    let body = read_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["studentCount"], 1);
    assert_eq!(body["data"]["attendanceCount"], 1);

    // Removing the student (and the cascading record) unblocks the delete.
    let res = app
        .clone()
        .oneshot(delete_req(&format!("/api/students/{}", siswa.id), &token))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.clone().oneshot(delete_req(&uri, &token)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.oneshot(get(&uri, &token)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
