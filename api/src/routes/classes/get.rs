use super::common::ClassResponse;
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::{class, user};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;
use util::state::AppState;

/// GET /api/classes
///
/// Lists every class ordered by name, with homeroom teacher name and the
/// derived student count. Small fixed set, no pagination.
pub async fn list_classes(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<ClassResponse>>>) {
    let db = state.db();

    let classes = match class::Entity::find()
        .order_by_asc(class::Column::Name)
        .all(db)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "DB error listing classes");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error listing classes")),
            );
        }
    };

    let class_ids: Vec<i64> = classes.iter().map(|c| c.id).collect();
    let counts = class::Model::student_counts_for(db, &class_ids)
        .await
        .unwrap_or_default();

    let teacher_ids: Vec<i64> = classes.iter().filter_map(|c| c.teacher_id).collect();
    let mut teacher_names: HashMap<i64, String> = HashMap::new();
    if !teacher_ids.is_empty() {
        let teachers = user::Entity::find()
            .filter(user::Column::Id.is_in(teacher_ids))
            .all(db)
            .await
            .unwrap_or_default();
        for t in teachers {
            teacher_names.insert(t.id, t.name);
        }
    }

    let data = classes
        .into_iter()
        .map(|c| {
            let count = counts.get(&c.id).copied().unwrap_or(0);
            let teacher = c.teacher_id.and_then(|t| teacher_names.get(&t).cloned());
            ClassResponse::from_with_details(c, teacher, count)
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(data, "Classes retrieved")),
    )
}

/// GET /api/classes/{class_id}
///
/// Fetch a single class with teacher name and student count.
///
/// ### Responses
/// - `200 OK` → `ClassResponse`
/// - `404 Not Found`
pub async fn get_class(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<ClassResponse>>) {
    let db = state.db();

    match class::Entity::find_by_id(class_id).one(db).await {
        Ok(Some(c)) => {
            let count = class::Model::student_count(db, c.id).await.unwrap_or(0);
            let teacher = match c.teacher_id {
                Some(t) => user::Entity::find_by_id(t)
                    .one(db)
                    .await
                    .ok()
                    .flatten()
                    .map(|u| u.name),
                None => None,
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    ClassResponse::from_with_details(c, teacher, count),
                    "Class retrieved",
                )),
            )
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Class not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, class_id, "DB error retrieving class");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving class")),
            )
        }
    }
}
