use crate::seed::Seeder;
use chrono::Utc;
use db::models::class;
use db::models::user::{self, Role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

pub struct ClassSeeder;

const CLASS_NAMES: [&str; 6] = ["1A", "1B", "2A", "2B", "3A", "3B"];

#[async_trait::async_trait]
impl Seeder for ClassSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        // Assign homerooms in id order so the pairing is stable across runs.
        let teachers = user::Entity::find()
            .filter(user::Column::Role.eq(Role::Teacher))
            .order_by_asc(user::Column::Id)
            .all(db)
            .await
            .unwrap_or_default();

        let now = Utc::now();
        for (i, name) in CLASS_NAMES.into_iter().enumerate() {
            let grade = name[..1].parse::<i32>().unwrap_or(1);
            let class = class::ActiveModel {
                name: Set(name.to_owned()),
                grade: Set(grade),
                teacher_id: Set(teachers.get(i).map(|t| t.id)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            let _ = class.insert(db).await;
        }
    }
}
