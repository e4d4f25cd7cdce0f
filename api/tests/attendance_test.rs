mod helpers;

use axum::http::StatusCode;
use chrono::NaiveDate;
use db::models::attendance_record::{self, AttendanceStatus};
use helpers::{
    get, make_app, post_json, read_json, seed_admin, seed_class, seed_record, seed_student,
    seed_teacher, token_for,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn marking_twice_updates_the_single_row() {
    let (app, state) = make_app().await;
    let admin = seed_admin(state.db()).await;
    let kelas = seed_class(state.db(), "1A", 1, None).await;
    let siswa = seed_student(state.db(), "0000000001", "Ani Wijaya", kelas.id).await;
    let token = token_for(&admin);

    let first = app
        .clone()
        .oneshot(post_json(
            "/api/attendance",
            &token,
            &json!({
                "studentId": siswa.id,
                "date": "2025-07-21",
                "status": "HADIR",
                "checkInTime": "07:15",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);
    let body = read_json(first).await;
    assert_eq!(body["data"]["status"], "HADIR");
    assert_eq!(body["data"]["checkInTime"], "07:15");
    assert_eq!(body["data"]["studentName"], "Ani Wijaya");
    assert_eq!(body["data"]["className"], "1A");

    let second = app
        .clone()
        .oneshot(post_json(
            "/api/attendance",
            &token,
            &json!({
                "studentId": siswa.id,
                "date": "2025-07-21",
                "status": "TERLAMBAT",
                "checkInTime": "08:05:30",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    let third = app
        .clone()
        .oneshot(post_json(
            "/api/attendance",
            &token,
            &json!({
                "studentId": siswa.id,
                "date": "2025-07-21",
                "status": "IZIN",
                "reason": "Acara keluarga",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(third.status(), StatusCode::OK);
    let body = read_json(third).await;
    assert_eq!(body["data"]["status"], "IZIN");
    assert_eq!(body["data"]["notes"], "Acara keluarga");

    // Still exactly one stored row, holding the latest status.
    let count = attendance_record::Entity::find()
        .filter(attendance_record::Column::StudentId.eq(siswa.id))
        .count(state.db())
        .await
        .unwrap();
    assert_eq!(count, 1);
    let stored = attendance_record::Entity::find_by_id((
        siswa.id,
        NaiveDate::from_ymd_opt(2025, 7, 21).unwrap(),
    ))
    .one(state.db())
    .await
    .unwrap()
    .unwrap();
    assert_eq!(stored.status, AttendanceStatus::Izin);
}

#[tokio::test]
async fn notes_win_over_reason_when_both_sent() {
    let (app, state) = make_app().await;
    let admin = seed_admin(state.db()).await;
    let kelas = seed_class(state.db(), "1A", 1, None).await;
    let siswa = seed_student(state.db(), "0000000001", "Ani Wijaya", kelas.id).await;

    let res = app
        .oneshot(post_json(
            "/api/attendance",
            &token_for(&admin),
            &json!({
                "studentId": siswa.id,
                "date": "2025-07-21",
                "status": "IZIN",
                "notes": "Surat dokter",
                "reason": "Sakit",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    assert_eq!(body["data"]["notes"], "Surat dokter");
}

#[tokio::test]
async fn mark_attendance_rejects_bad_input_and_unknown_student() {
    let (app, state) = make_app().await;
    let admin = seed_admin(state.db()).await;
    let kelas = seed_class(state.db(), "1A", 1, None).await;
    let siswa = seed_student(state.db(), "0000000001", "Ani Wijaya", kelas.id).await;
    let token = token_for(&admin);

    let bad_status = app
        .clone()
        .oneshot(post_json(
            "/api/attendance",
            &token,
            &json!({ "studentId": siswa.id, "date": "2025-07-21", "status": "BOLOS" }),
        ))
        .await
        .unwrap();
    assert_eq!(bad_status.status(), StatusCode::BAD_REQUEST);

    let bad_date = app
        .clone()
        .oneshot(post_json(
            "/api/attendance",
            &token,
            &json!({ "studentId": siswa.id, "date": "21-07-2025", "status": "HADIR" }),
        ))
        .await
        .unwrap();
    assert_eq!(bad_date.status(), StatusCode::BAD_REQUEST);

    let bad_time = app
        .clone()
        .oneshot(post_json(
            "/api/attendance",
            &token,
            &json!({
                "studentId": siswa.id,
                "date": "2025-07-21",
                "status": "HADIR",
                "checkInTime": "7 pagi",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(bad_time.status(), StatusCode::BAD_REQUEST);

    let unknown_student = app
        .oneshot(post_json(
            "/api/attendance",
            &token,
            &json!({ "studentId": 9999, "date": "2025-07-21", "status": "HADIR" }),
        ))
        .await
        .unwrap();
    assert_eq!(unknown_student.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn teacher_cannot_mark_students_of_other_classes() {
    let (app, state) = make_app().await;
    let teacher = seed_teacher(state.db(), "guru.satu").await;
    let own = seed_class(state.db(), "1A", 1, Some(teacher.id)).await;
    let other = seed_class(state.db(), "1B", 1, None).await;
    let own_student = seed_student(state.db(), "0000000001", "Ani Wijaya", own.id).await;
    let outsider = seed_student(state.db(), "0000000002", "Budi Santoso", other.id).await;
    let token = token_for(&teacher);

    let allowed = app
        .clone()
        .oneshot(post_json(
            "/api/attendance",
            &token,
            &json!({ "studentId": own_student.id, "date": "2025-07-21", "status": "HADIR" }),
        ))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::CREATED);

    // The student's stored class decides, not the classId in the body.
    let denied = app
        .oneshot(post_json(
            "/api/attendance",
            &token,
            &json!({
                "studentId": outsider.id,
                "classId": own.id,
                "date": "2025-07-21",
                "status": "HADIR",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn omitted_date_defaults_to_today() {
    let (app, state) = make_app().await;
    let admin = seed_admin(state.db()).await;
    let kelas = seed_class(state.db(), "1A", 1, None).await;
    let siswa = seed_student(state.db(), "0000000001", "Ani Wijaya", kelas.id).await;

    let res = app
        .oneshot(post_json(
            "/api/attendance",
            &token_for(&admin),
            &json!({ "studentId": siswa.id, "status": "HADIR" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let today = chrono::Utc::now().date_naive();
    let stored = attendance_record::Entity::find_by_id((siswa.id, today))
        .one(state.db())
        .await
        .unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn list_filters_by_date_and_orders_newest_first() {
    let (app, state) = make_app().await;
    let admin = seed_admin(state.db()).await;
    let kelas_a = seed_class(state.db(), "1A", 1, None).await;
    let kelas_b = seed_class(state.db(), "1B", 1, None).await;
    let ani = seed_student(state.db(), "0000000001", "Ani Wijaya", kelas_a.id).await;
    let budi = seed_student(state.db(), "0000000002", "Budi Santoso", kelas_b.id).await;
    let d1 = NaiveDate::from_ymd_opt(2025, 7, 21).unwrap();
    let d2 = NaiveDate::from_ymd_opt(2025, 7, 22).unwrap();
    seed_record(state.db(), ani.id, d1, AttendanceStatus::Hadir, None).await;
    seed_record(state.db(), budi.id, d1, AttendanceStatus::Izin, None).await;
    seed_record(state.db(), ani.id, d2, AttendanceStatus::Terlambat, None).await;
    let token = token_for(&admin);

    let all = app
        .clone()
        .oneshot(get("/api/attendance", &token))
        .await
        .unwrap();
    assert_eq!(all.status(), StatusCode::OK);
    let body = read_json(all).await;
    let rows = body["data"]["attendanceRecords"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    // Newest date first, then class name.
    assert_eq!(rows[0]["date"], "2025-07-22");
    assert_eq!(rows[1]["date"], "2025-07-21");
    assert_eq!(rows[1]["className"], "1A");
    assert_eq!(rows[2]["className"], "1B");

    let single_day = app
        .clone()
        .oneshot(get("/api/attendance?date=2025-07-21", &token))
        .await
        .unwrap();
    let body = read_json(single_day).await;
    assert_eq!(body["data"]["attendanceRecords"].as_array().unwrap().len(), 2);

    let ranged = app
        .clone()
        .oneshot(get(
            "/api/attendance?startDate=2025-07-22&endDate=2025-07-23",
            &token,
        ))
        .await
        .unwrap();
    let body = read_json(ranged).await;
    let rows = body["data"]["attendanceRecords"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "TERLAMBAT");

    let by_student = app
        .clone()
        .oneshot(get(&format!("/api/attendance?studentId={}", ani.id), &token))
        .await
        .unwrap();
    let body = read_json(by_student).await;
    assert_eq!(body["data"]["attendanceRecords"].as_array().unwrap().len(), 2);

    let half_range = app
        .clone()
        .oneshot(get("/api/attendance?startDate=2025-07-21", &token))
        .await
        .unwrap();
    assert_eq!(half_range.status(), StatusCode::BAD_REQUEST);

    let inverted = app
        .oneshot(get(
            "/api/attendance?startDate=2025-07-22&endDate=2025-07-21",
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(inverted.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn teacher_listing_is_scoped_to_own_class() {
    let (app, state) = make_app().await;
    let teacher = seed_teacher(state.db(), "guru.satu").await;
    let own = seed_class(state.db(), "1A", 1, Some(teacher.id)).await;
    let other = seed_class(state.db(), "1B", 1, None).await;
    let ani = seed_student(state.db(), "0000000001", "Ani Wijaya", own.id).await;
    let budi = seed_student(state.db(), "0000000002", "Budi Santoso", other.id).await;
    let d = NaiveDate::from_ymd_opt(2025, 7, 21).unwrap();
    seed_record(state.db(), ani.id, d, AttendanceStatus::Hadir, None).await;
    seed_record(state.db(), budi.id, d, AttendanceStatus::Hadir, None).await;
    let token = token_for(&teacher);

    let list = app
        .clone()
        .oneshot(get("/api/attendance", &token))
        .await
        .unwrap();
    assert_eq!(list.status(), StatusCode::OK);
    let body = read_json(list).await;
    let rows = body["data"]["attendanceRecords"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["studentName"], "Ani Wijaya");

    let foreign = app
        .oneshot(get(&format!("/api/attendance?classId={}", other.id), &token))
        .await
        .unwrap();
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN);
}
