mod helpers;

use axum::http::StatusCode;
use chrono::NaiveDate;
use db::models::attendance_record::AttendanceStatus;
use helpers::{
    delete_req, get, make_app, post_json, put_json, read_json, seed_admin, seed_class, seed_record,
    seed_student, seed_teacher, token_for,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn create_student_validates_and_conflicts() {
    let (app, state) = make_app().await;
    let admin = seed_admin(state.db()).await;
    let kelas = seed_class(state.db(), "1A", 1, None).await;
    let token = token_for(&admin);

    let created = app
        .clone()
        .oneshot(post_json(
            "/api/students",
            &token,
            &json!({
                "nisn": "0012345678",
                "name": "Ani Wijaya",
                "classId": kelas.id,
                "gender": "P",
                "birthDate": "2013-02-11",
                "guardianName": "Ibu Wijaya",
                "guardianPhone": "081234567890",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = read_json(created).await;
    assert_eq!(body["data"]["nisn"], "0012345678");
    assert_eq!(body["data"]["className"], "1A");
    assert_eq!(body["data"]["status"], "ACTIVE");

    let bad_nisn = app
        .clone()
        .oneshot(post_json(
            "/api/students",
            &token,
            &json!({
                "nisn": "12345",
                "name": "Budi",
                "classId": kelas.id,
                "gender": "L",
                "birthDate": "2013-02-11",
                "guardianName": "Pak Budi",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(bad_nisn.status(), StatusCode::BAD_REQUEST);

    let duplicate_nisn = app
        .clone()
        .oneshot(post_json(
            "/api/students",
            &token,
            &json!({
                "nisn": "0012345678",
                "name": "Budi",
                "classId": kelas.id,
                "gender": "L",
                "birthDate": "2013-02-11",
                "guardianName": "Pak Budi",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(duplicate_nisn.status(), StatusCode::CONFLICT);

    let unknown_class = app
        .clone()
        .oneshot(post_json(
            "/api/students",
            &token,
            &json!({
                "nisn": "0012345679",
                "name": "Budi",
                "classId": 9999,
                "gender": "L",
                "birthDate": "2013-02-11",
                "guardianName": "Pak Budi",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(unknown_class.status(), StatusCode::NOT_FOUND);

    let bad_gender = app
        .oneshot(post_json(
            "/api/students",
            &token,
            &json!({
                "nisn": "0012345679",
                "name": "Budi",
                "classId": kelas.id,
                "gender": "X",
                "birthDate": "2013-02-11",
                "guardianName": "Pak Budi",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(bad_gender.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_students_filters_by_class_status_and_query() {
    let (app, state) = make_app().await;
    let admin = seed_admin(state.db()).await;
    let kelas = seed_class(state.db(), "1A", 1, None).await;
    let other = seed_class(state.db(), "1B", 1, None).await;
    seed_student(state.db(), "0000000001", "Ani Wijaya", kelas.id).await;
    let budi = seed_student(state.db(), "0000000002", "Budi Santoso", kelas.id).await;
    seed_student(state.db(), "0000000003", "Citra Lestari", other.id).await;
    let token = token_for(&admin);

    // Mark one student inactive to exercise the status filter.
    app.clone()
        .oneshot(put_json(
            &format!("/api/students/{}", budi.id),
            &token,
            &json!({ "status": "INACTIVE" }),
        ))
        .await
        .unwrap();

    let all = app.clone().oneshot(get("/api/students", &token)).await.unwrap();
    let body = read_json(all).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let by_class = app
        .clone()
        .oneshot(get(
            &format!("/api/students?classId={}", kelas.id),
            &token,
        ))
        .await
        .unwrap();
    let body = read_json(by_class).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ani Wijaya", "Budi Santoso"]);

    let active_only = app
        .clone()
        .oneshot(get("/api/students?status=ACTIVE", &token))
        .await
        .unwrap();
    let body = read_json(active_only).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Free-text search matches names and NISN.
    let by_name = app
        .clone()
        .oneshot(get("/api/students?q=citra", &token))
        .await
        .unwrap();
    let body = read_json(by_name).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Citra Lestari");

    let by_nisn = app
        .clone()
        .oneshot(get("/api/students?q=0000000002", &token))
        .await
        .unwrap();
    let body = read_json(by_nisn).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["nisn"], "0000000002");

    let bad_status = app
        .oneshot(get("/api/students?status=GRADUATED", &token))
        .await
        .unwrap();
    assert_eq!(bad_status.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn teachers_are_scoped_to_their_own_class() {
    let (app, state) = make_app().await;
    let teacher = seed_teacher(state.db(), "guru.satu").await;
    let own = seed_class(state.db(), "1A", 1, Some(teacher.id)).await;
    let other = seed_class(state.db(), "1B", 1, None).await;
    seed_student(state.db(), "0000000001", "Ani Wijaya", own.id).await;
    let outsider = seed_student(state.db(), "0000000002", "Budi Santoso", other.id).await;
    let token = token_for(&teacher);

    // No filter: silently narrowed to the teacher's class.
    let list = app.clone().oneshot(get("/api/students", &token)).await.unwrap();
    assert_eq!(list.status(), StatusCode::OK);
    let body = read_json(list).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Ani Wijaya");

    // Naming another class explicitly is refused rather than narrowed.
    let foreign_list = app
        .clone()
        .oneshot(get(&format!("/api/students?classId={}", other.id), &token))
        .await
        .unwrap();
    assert_eq!(foreign_list.status(), StatusCode::FORBIDDEN);

    let foreign_get = app
        .clone()
        .oneshot(get(&format!("/api/students/{}", outsider.id), &token))
        .await
        .unwrap();
    assert_eq!(foreign_get.status(), StatusCode::FORBIDDEN);

    // Mutations stay admin-only even for the own class.
    let create = app
        .oneshot(post_json(
            "/api/students",
            &token,
            &json!({
                "nisn": "0000000003",
                "name": "Citra",
                "classId": own.id,
                "gender": "P",
                "birthDate": "2013-02-11",
                "guardianName": "Wali",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(create.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn teacher_without_homeroom_sees_no_students() {
    let (app, state) = make_app().await;
    let teacher = seed_teacher(state.db(), "guru.bebas").await;
    let kelas = seed_class(state.db(), "1A", 1, None).await;
    seed_student(state.db(), "0000000001", "Ani Wijaya", kelas.id).await;

    let res = app
        .oneshot(get("/api/students", &token_for(&teacher)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn update_student_moves_class_and_rejects_unknown_target() {
    let (app, state) = make_app().await;
    let admin = seed_admin(state.db()).await;
    let kelas = seed_class(state.db(), "1A", 1, None).await;
    let other = seed_class(state.db(), "1B", 1, None).await;
    let siswa = seed_student(state.db(), "0000000001", "Ani Wijaya", kelas.id).await;
    let token = token_for(&admin);
    let uri = format!("/api/students/{}", siswa.id);

    let moved = app
        .clone()
        .oneshot(put_json(&uri, &token, &json!({ "classId": other.id })))
        .await
        .unwrap();
    assert_eq!(moved.status(), StatusCode::OK);
    let body = read_json(moved).await;
    assert_eq!(body["data"]["classId"], other.id);
    assert_eq!(body["data"]["className"], "1B");

    let unknown = app
        .oneshot(put_json(&uri, &token, &json!({ "classId": 9999 })))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_student_removes_attendance_records() {
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
    seed_record(
        state.db(),
        siswa.id,
        NaiveDate::from_ymd_opt(2025, 7, 22).unwrap(),
        AttendanceStatus::Izin,
        None,
    )
    .await;

    let res = app
        .clone()
        .oneshot(delete_req(
            &format!("/api/students/{}", siswa.id),
            &token_for(&admin),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let leftover = db::models::attendance_record::Entity::find()
        .filter(db::models::attendance_record::Column::StudentId.eq(siswa.id))
        .count(state.db())
        .await
        .unwrap();
    assert_eq!(leftover, 0);

    let gone = app
        .oneshot(get(
            &format!("/api/students/{}", siswa.id),
            &token_for(&admin),
        ))
        .await
        .unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}
