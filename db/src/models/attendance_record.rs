use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One attendance fact per (student, date) in the `attendance_records` table.
///
/// The composite primary key carries the upsert semantics: a second write for
/// the same student and date updates the existing row (last write wins).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: Date,

    pub status: AttendanceStatus,
    pub check_in_time: Option<Time>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Daily attendance status. Any status may overwrite any other via upsert;
/// there are no transition rules.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Display,
    EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status_type")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "HADIR")]
    Hadir,

    #[sea_orm(string_value = "TERLAMBAT")]
    Terlambat,

    #[default]
    #[sea_orm(string_value = "TIDAK_HADIR")]
    TidakHadir,

    #[sea_orm(string_value = "IZIN")]
    Izin,
}

impl AttendanceStatus {
    /// Single-letter code used in the printable grid (A is "alpa").
    pub fn letter(&self) -> &'static str {
        match self {
            AttendanceStatus::Hadir => "H",
            AttendanceStatus::Terlambat => "T",
            AttendanceStatus::TidakHadir => "A",
            AttendanceStatus::Izin => "I",
        }
    }

    /// Human-readable Indonesian label.
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Hadir => "Hadir",
            AttendanceStatus::Terlambat => "Terlambat",
            AttendanceStatus::TidakHadir => "Tidak Hadir",
            AttendanceStatus::Izin => "Izin",
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Creates or updates the record for (student, date). Returns the stored
    /// row and whether it was newly created.
    pub async fn upsert(
        db: &DatabaseConnection,
        student_id: i64,
        date: Date,
        status: AttendanceStatus,
        check_in_time: Option<Time>,
        notes: Option<String>,
    ) -> Result<(Model, bool), DbErr> {
        let now = Utc::now();

        match Entity::find_by_id((student_id, date)).one(db).await? {
            Some(existing) => {
                let mut record = existing.into_active_model();
                record.status = Set(status);
                record.check_in_time = Set(check_in_time);
                record.notes = Set(notes);
                record.updated_at = Set(now);
                Ok((record.update(db).await?, false))
            }
            None => {
                let record = ActiveModel {
                    student_id: Set(student_id),
                    date: Set(date),
                    status: Set(status),
                    check_in_time: Set(check_in_time),
                    notes: Set(notes),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                Ok((record.insert(db).await?, true))
            }
        }
    }
}
