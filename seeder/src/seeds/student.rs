use crate::seed::Seeder;
use chrono::{Datelike, Utc};
use db::models::class;
use db::models::student::{Gender, Model, StudentStatus};
use sea_orm::prelude::Date;
use sea_orm::{DatabaseConnection, EntityTrait};

pub struct StudentSeeder;

const FIRST_NAMES: [&str; 16] = [
    "Ahmad", "Budi", "Citra", "Dewi", "Eka", "Fajar", "Gita", "Hendra", "Indah", "Joko",
    "Kartika", "Lutfi", "Maya", "Nanda", "Putri", "Rizki",
];

const LAST_NAMES: [&str; 12] = [
    "Santoso",
    "Wijaya",
    "Saputra",
    "Lestari",
    "Pratama",
    "Utami",
    "Hidayat",
    "Maulana",
    "Anggraini",
    "Firmansyah",
    "Nugroho",
    "Rahmawati",
];

#[async_trait::async_trait]
impl Seeder for StudentSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let classes = class::Entity::find().all(db).await.unwrap_or_default();
        let current_year = Utc::now().year();

        for class in classes {
            let count = 8 + fastrand::usize(..5);
            for _ in 0..count {
                let first = FIRST_NAMES[fastrand::usize(..FIRST_NAMES.len())];
                let last = LAST_NAMES[fastrand::usize(..LAST_NAMES.len())];
                let name = format!("{first} {last}");
                let nisn = format!("00{:08}", fastrand::u32(..100_000_000));
                let gender = if fastrand::bool() { Gender::L } else { Gender::P };

                // Grade 1 pupils are around seven years old.
                let year = current_year - 6 - class.grade;
                let month = 1 + fastrand::u32(..12);
                let day = 1 + fastrand::u32(..28);
                let Some(birth_date) = Date::from_ymd_opt(year, month, day) else {
                    continue;
                };

                let guardian_title = if fastrand::bool() { "Bapak" } else { "Ibu" };
                let guardian_name = format!("{guardian_title} {last}");
                let guardian_phone = format!("08{:010}", fastrand::u64(..10_000_000_000));

                // Random NISNs can collide with the unique column; skip those rows.
                let _ = Model::create(
                    db,
                    &nisn,
                    &name,
                    class.id,
                    gender,
                    birth_date,
                    &guardian_name,
                    Some(&guardian_phone),
                    StudentStatus::Active,
                )
                .await;
            }
        }
    }
}
