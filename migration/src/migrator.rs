use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202507050001_create_users::Migration),
            Box::new(migrations::m202507050002_create_classes::Migration),
            Box::new(migrations::m202507050003_create_students::Migration),
            Box::new(migrations::m202507050004_create_attendance_records::Migration),
        ]
    }
}
