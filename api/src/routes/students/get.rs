use super::common::{ListQuery, StudentResponse, parse_student_status};
use crate::auth::guards::{ClassScope, Principal};
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::{class, student};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;
use util::state::AppState;

/// GET /api/students
///
/// Lists students ordered by name. Teachers only ever see their own class;
/// admins may filter freely.
///
/// **Query**:
/// - `classId` *(optional)* — teachers may only name their own class (403
///   otherwise)
/// - `status` *(optional)* — `ACTIVE` | `INACTIVE`
/// - `q` *(optional)* — substring match on name or NISN
pub async fn list_students(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(q): Query<ListQuery>,
) -> impl IntoResponse {
    let db = state.db();

    let scope = match principal.scope_class(q.class_id) {
        Ok(s) => s,
        Err(denied) => return denied.into_response(),
    };

    let status = match q.status.as_deref() {
        Some(raw) => match parse_student_status(raw) {
            Ok(s) => Some(s),
            Err(msg) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<Vec<StudentResponse>>::error(msg)),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let mut sel = student::Entity::find();
    match scope {
        ClassScope::All => {}
        ClassScope::Class(class_id) => {
            sel = sel.filter(student::Column::ClassId.eq(class_id));
        }
        ClassScope::Nothing => {
            return (
                StatusCode::OK,
                Json(ApiResponse::success(
                    Vec::<StudentResponse>::new(),
                    "Students retrieved",
                )),
            )
                .into_response();
        }
    }
    if let Some(status) = status {
        sel = sel.filter(student::Column::Status.eq(status));
    }
    if let Some(needle) = q.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        sel = sel.filter(
            Condition::any()
                .add(student::Column::Name.contains(needle))
                .add(student::Column::Nisn.contains(needle)),
        );
    }

    let students = match sel.order_by_asc(student::Column::Name).all(db).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "DB error listing students");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Vec<StudentResponse>>::error(
                    "Database error listing students",
                )),
            )
                .into_response();
        }
    };

    let class_ids: Vec<i64> = students.iter().map(|s| s.class_id).collect();
    let mut class_names: HashMap<i64, String> = HashMap::new();
    if !class_ids.is_empty() {
        let classes = class::Entity::find()
            .filter(class::Column::Id.is_in(class_ids))
            .all(db)
            .await
            .unwrap_or_default();
        for c in classes {
            class_names.insert(c.id, c.name);
        }
    }

    let data: Vec<StudentResponse> = students
        .into_iter()
        .map(|s| {
            let class_name = class_names.get(&s.class_id).cloned();
            StudentResponse::with_class_name(s, class_name)
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(data, "Students retrieved")),
    )
        .into_response()
}

/// GET /api/students/{student_id}
///
/// Fetch one student. Teachers can only read students of their own class.
///
/// ### Responses
/// - `200 OK` → `StudentResponse`
/// - `403 Forbidden` — student belongs to another class
/// - `404 Not Found`
pub async fn get_student(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<StudentResponse>>) {
    let db = state.db();

    match student::Entity::find_by_id(student_id).one(db).await {
        Ok(Some(s)) => {
            if !principal.may_manage_class(s.class_id) {
                return (
                    StatusCode::FORBIDDEN,
                    Json(ApiResponse::error("You may only access your own class")),
                );
            }
            let class_name = class::Entity::find_by_id(s.class_id)
                .one(db)
                .await
                .ok()
                .flatten()
                .map(|c| c.name);
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    StudentResponse::with_class_name(s, class_name),
                    "Student retrieved",
                )),
            )
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, student_id, "DB error retrieving student");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving student")),
            )
        }
    }
}
