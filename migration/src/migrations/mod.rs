pub mod m202507050001_create_users;
pub mod m202507050002_create_classes;
pub mod m202507050003_create_students;
pub mod m202507050004_create_attendance_records;
