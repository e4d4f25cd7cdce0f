use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A student in the `students` table. Belongs to exactly one class.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// National student identification number, unique.
    pub nisn: String,
    pub name: String,
    pub class_id: i64,
    pub gender: Gender,
    pub birth_date: Date,
    pub guardian_name: String,
    pub guardian_phone: Option<String>,
    /// Enrollment status. Separate from daily attendance status.
    pub status: StudentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize,
    Serialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "gender_type")]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    /// Laki-laki (male).
    #[sea_orm(string_value = "L")]
    L,

    /// Perempuan (female).
    #[sea_orm(string_value = "P")]
    P,
}

#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize,
    Serialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "student_status_type")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum StudentStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,

    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id"
    )]
    Class,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &DatabaseConnection,
        nisn: &str,
        name: &str,
        class_id: i64,
        gender: Gender,
        birth_date: Date,
        guardian_name: &str,
        guardian_phone: Option<&str>,
        status: StudentStatus,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let student = ActiveModel {
            nisn: Set(nisn.to_owned()),
            name: Set(name.to_owned()),
            class_id: Set(class_id),
            gender: Set(gender),
            birth_date: Set(birth_date),
            guardian_name: Set(guardian_name.to_owned()),
            guardian_phone: Set(guardian_phone.map(str::to_owned)),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        student.insert(db).await
    }

    /// All students of a class, ordered by name. This is the roster used by
    /// reconciliation and the printable grid.
    pub async fn roster(db: &DatabaseConnection, class_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Name)
            .all(db)
            .await
    }

    pub async fn find_by_nisn(
        db: &DatabaseConnection,
        nisn: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find().filter(Column::Nisn.eq(nisn)).one(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::class;
    use crate::test_utils::setup_test_db;
    use sea_orm::Set;

    #[tokio::test]
    async fn test_roster_is_ordered_by_name() {
        let db = setup_test_db().await;
        let now = Utc::now();
        let kelas = class::ActiveModel {
            name: Set("3A".to_string()),
            grade: Set(3),
            teacher_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect("Failed to create class");

        for (nisn, name) in [
            ("0090000001", "Citra Lestari"),
            ("0090000002", "Ani Wijaya"),
            ("0090000003", "Budi Santoso"),
        ] {
            Model::create(
                &db,
                nisn,
                name,
                kelas.id,
                Gender::L,
                Date::from_ymd_opt(2012, 5, 20).unwrap(),
                "Wali",
                None,
                StudentStatus::Active,
            )
            .await
            .expect("Failed to create student");
        }

        let roster = Model::roster(&db, kelas.id).await.expect("Failed to load roster");
        let names: Vec<&str> = roster.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ani Wijaya", "Budi Santoso", "Citra Lestari"]);
    }

    #[tokio::test]
    async fn test_find_by_nisn() {
        let db = setup_test_db().await;
        let now = Utc::now();
        let kelas = class::ActiveModel {
            name: Set("3B".to_string()),
            grade: Set(3),
            teacher_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect("Failed to create class");

        let created = Model::create(
            &db,
            "0012345678",
            "Dewi Anggraini",
            kelas.id,
            Gender::P,
            Date::from_ymd_opt(2012, 11, 3).unwrap(),
            "Wali",
            Some("081234567890"),
            StudentStatus::Active,
        )
        .await
        .expect("Failed to create student");

        let found = Model::find_by_nisn(&db, "0012345678")
            .await
            .expect("Failed to query student")
            .expect("Student missing");
        assert_eq!(found.id, created.id);

        let missing = Model::find_by_nisn(&db, "9999999999")
            .await
            .expect("Failed to query student");
        assert!(missing.is_none());
    }
}
