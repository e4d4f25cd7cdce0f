use crate::seed::Seeder;
use chrono::{Days, Utc};
use db::models::attendance_record::{AttendanceStatus, Model};
use db::models::student;
use db::report::school_days;
use sea_orm::prelude::Time;
use sea_orm::{DatabaseConnection, EntityTrait};

pub struct AttendanceSeeder;

const EXCUSE_NOTES: [&str; 3] = ["Sakit", "Acara keluarga", "Izin orang tua"];

#[async_trait::async_trait]
impl Seeder for AttendanceSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let students = student::Entity::find().all(db).await.unwrap_or_default();
        let today = Utc::now().date_naive();
        let start = today - Days::new(29);

        for date in school_days(start, today) {
            for s in &students {
                let roll = fastrand::u32(..100);
                let (status, check_in_minutes, notes) = if roll < 85 {
                    // On time, arriving between 06:30 and 07:29.
                    (AttendanceStatus::Hadir, Some(390 + fastrand::u32(..60)), None)
                } else if roll < 92 {
                    (
                        AttendanceStatus::Terlambat,
                        Some(450 + fastrand::u32(..60)),
                        None,
                    )
                } else if roll < 97 {
                    let note = EXCUSE_NOTES[fastrand::usize(..EXCUSE_NOTES.len())];
                    (AttendanceStatus::Izin, None, Some(note.to_owned()))
                } else {
                    (AttendanceStatus::TidakHadir, None, None)
                };

                let check_in_time =
                    check_in_minutes.and_then(|m| Time::from_hms_opt(m / 60, m % 60, 0));

                let _ = Model::upsert(db, s.id, date, status, check_in_time, notes).await;
            }
        }
    }
}
