use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, QueryFilter};
use serde::Serialize;
use std::collections::HashMap;

/// A class (homeroom group) in the `classes` table.
///
/// The student count is not stored here; it is derived with [`Model::student_count`]
/// so it can never drift from the `students` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique class name, e.g. "1A".
    pub name: String,
    pub grade: i32,
    /// Homeroom teacher. At most one class per teacher (unique column).
    pub teacher_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::student::Entity")]
    Students,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Number of students currently enrolled in the class (derived read).
    pub async fn student_count(db: &DatabaseConnection, class_id: i64) -> Result<i64, DbErr> {
        let n = super::student::Entity::find()
            .filter(super::student::Column::ClassId.eq(class_id))
            .count(db)
            .await?;
        Ok(n as i64)
    }

    /// Student counts for a batch of classes, keyed by class id.
    pub async fn student_counts_for(
        db: &DatabaseConnection,
        class_ids: &[i64],
    ) -> Result<HashMap<i64, i64>, DbErr> {
        let mut map = HashMap::new();
        if class_ids.is_empty() {
            return Ok(map);
        }
        let students = super::student::Entity::find()
            .filter(super::student::Column::ClassId.is_in(class_ids.to_vec()))
            .all(db)
            .await?;
        for s in students {
            *map.entry(s.class_id).or_insert(0) += 1;
        }
        Ok(map)
    }

    /// Number of attendance records belonging to students of the class.
    pub async fn attendance_count(db: &DatabaseConnection, class_id: i64) -> Result<i64, DbErr> {
        let student_ids: Vec<i64> = super::student::Entity::find()
            .filter(super::student::Column::ClassId.eq(class_id))
            .all(db)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();

        if student_ids.is_empty() {
            return Ok(0);
        }

        let n = super::attendance_record::Entity::find()
            .filter(super::attendance_record::Column::StudentId.is_in(student_ids))
            .count(db)
            .await?;
        Ok(n as i64)
    }

    pub async fn find_by_teacher(
        db: &DatabaseConnection,
        teacher_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .one(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{attendance_record, student};
    use crate::test_utils::setup_test_db;
    use chrono::NaiveDate;
    use sea_orm::Set;

    async fn seed_class(db: &DatabaseConnection, name: &str, grade: i32) -> Model {
        let now = chrono::Utc::now();
        ActiveModel {
            name: Set(name.to_string()),
            grade: Set(grade),
            teacher_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create class")
    }

    async fn seed_student(db: &DatabaseConnection, nisn: &str, class_id: i64) -> student::Model {
        student::Model::create(
            db,
            nisn,
            "Siswa Uji",
            class_id,
            student::Gender::P,
            NaiveDate::from_ymd_opt(2013, 8, 17).unwrap(),
            "Wali Uji",
            None,
            student::StudentStatus::Active,
        )
        .await
        .expect("Failed to create student")
    }

    #[tokio::test]
    async fn test_student_count_follows_enrollment() {
        let db = setup_test_db().await;
        let kelas = seed_class(&db, "1A", 1).await;
        let other = seed_class(&db, "1B", 1).await;

        assert_eq!(Model::student_count(&db, kelas.id).await.unwrap(), 0);

        seed_student(&db, "0011111111", kelas.id).await;
        seed_student(&db, "0022222222", kelas.id).await;
        seed_student(&db, "0033333333", other.id).await;

        assert_eq!(Model::student_count(&db, kelas.id).await.unwrap(), 2);
        assert_eq!(Model::student_count(&db, other.id).await.unwrap(), 1);

        let counts = Model::student_counts_for(&db, &[kelas.id, other.id])
            .await
            .expect("Failed to batch count");
        assert_eq!(counts.get(&kelas.id), Some(&2));
        assert_eq!(counts.get(&other.id), Some(&1));
    }

    #[tokio::test]
    async fn test_attendance_count_spans_class_students() {
        let db = setup_test_db().await;
        let kelas = seed_class(&db, "2A", 2).await;

        assert_eq!(Model::attendance_count(&db, kelas.id).await.unwrap(), 0);

        let a = seed_student(&db, "0044444444", kelas.id).await;
        let b = seed_student(&db, "0055555555", kelas.id).await;
        let date = NaiveDate::from_ymd_opt(2025, 7, 21).unwrap();

        attendance_record::Model::upsert(
            &db,
            a.id,
            date,
            attendance_record::AttendanceStatus::Hadir,
            None,
            None,
        )
        .await
        .expect("Failed to record attendance");
        attendance_record::Model::upsert(
            &db,
            b.id,
            date,
            attendance_record::AttendanceStatus::Izin,
            None,
            None,
        )
        .await
        .expect("Failed to record attendance");

        assert_eq!(Model::attendance_count(&db, kelas.id).await.unwrap(), 2);
    }
}
