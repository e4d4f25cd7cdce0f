use crate::seed::Seeder;
use db::models::user::{Model, Role};
use sea_orm::DatabaseConnection;

pub struct UserSeeder;

/// Homeroom teachers with their NIP (18-digit employee number).
const TEACHERS: [(&str, &str); 6] = [
    ("Siti Rahayu", "196805122000032001"),
    ("Agus Salim", "197103151998021003"),
    ("Rina Marlina", "198204202006042002"),
    ("Dedi Kurniawan", "197911082005011007"),
    ("Lia Amalia", "198807172012032005"),
    ("Bambang Pamungkas", "196912302001121004"),
];

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        // Fixed admin account
        let _ = Model::create(
            db,
            "admin",
            "admin@sekolah.sch.id",
            "password123",
            "Administrator",
            Role::Admin,
            None,
            None,
        )
        .await;

        for (name, nip) in TEACHERS {
            let first = name.split_whitespace().next().unwrap_or(name).to_lowercase();
            let username = format!("guru.{first}");
            let email = format!("{username}@sekolah.sch.id");
            let phone = format!("08{:010}", fastrand::u64(..10_000_000_000));
            let _ = Model::create(
                db,
                &username,
                &email,
                "password123",
                name,
                Role::Teacher,
                Some(nip),
                Some(&phone),
            )
            .await;
        }
    }
}
